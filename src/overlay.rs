use crate::constants::{LOADING_ID, TELEMETRY_ID};
use crate::core::Telemetry;
use web_sys as web;

#[inline]
pub fn show(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().remove_1("hidden");
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().add_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "display:none");
    }
}

/// Loading text stays visible until the source is ready; errors replace it.
pub fn update_loading(document: &web::Document, loading: &str, ready: bool) {
    if ready {
        hide(document, LOADING_ID);
        return;
    }
    if let Some(el) = document.get_element_by_id(LOADING_ID) {
        let text = match loading.strip_prefix("error: ") {
            Some(msg) => format!("Error: {msg}"),
            None => format!("Loading... ({loading})"),
        };
        el.set_text_content(Some(&text));
    }
    show(document, LOADING_ID);
}

pub fn update_telemetry(document: &web::Document, telemetry: &Telemetry) {
    if let Some(el) = document.get_element_by_id(TELEMETRY_ID) {
        el.set_text_content(Some(&telemetry.to_string()));
    }
}
