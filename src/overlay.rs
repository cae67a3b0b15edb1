use crate::constants::{DEBUG_ID, OVERLAY_ID, STATUS_ID};
use lead_core::DebugLog;
use web_sys as web;

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(OVERLAY_ID) {
        let cl = el.class_list();
        _ = cl.add_1("hidden");
        // fallback for pages without the CSS class
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn set_status(document: &web::Document, msg: &str) {
    if let Some(el) = document.get_element_by_id(STATUS_ID) {
        el.set_text_content(Some(msg));
    }
}

/// On-screen mirror of the debug log, kept in the `#debug` element.
pub struct DebugPanel {
    document: web::Document,
    log: DebugLog,
}

impl DebugPanel {
    pub fn new(document: web::Document) -> Self {
        Self {
            document,
            log: DebugLog::default(),
        }
    }

    pub fn push(&mut self, msg: &str) {
        self.log.push(seconds_of_day(), msg);
        self.render();
    }

    pub fn clear(&mut self) {
        self.log.clear();
        self.render();
    }

    fn render(&self) {
        if let Some(el) = self.document.get_element_by_id(DEBUG_ID) {
            el.set_text_content(Some(&self.log.render()));
        }
    }
}

fn seconds_of_day() -> u32 {
    let d = js_sys::Date::new_0();
    d.get_hours() * 3600 + d.get_minutes() * 60 + d.get_seconds()
}
