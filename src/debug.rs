//! Filterable debug logging for the link glue
//!
//! Categories: BOOT, TOKEN, WIDGET, EXCHANGE
//! Enable via: ?lkdebug=all or localStorage.setItem('linkglue.debug','token,widget')

use std::sync::atomic::{AtomicU32, Ordering};

pub mod cat {
    pub const BOOT: u32 = 1 << 0;
    pub const TOKEN: u32 = 1 << 1;
    pub const WIDGET: u32 = 1 << 2;
    pub const EXCHANGE: u32 = 1 << 3;
    pub const ALL: u32 = 0xffff_ffff;
}

static MASK: AtomicU32 = AtomicU32::new(0);

#[inline]
pub fn mask() -> u32 {
    MASK.load(Ordering::Relaxed)
}

#[inline]
pub fn set(mask: u32) {
    MASK.store(mask, Ordering::Relaxed)
}

#[inline]
pub fn is(cat: u32) -> bool {
    (MASK.load(Ordering::Relaxed) & cat) != 0
}

#[inline]
pub fn cat_name(cat: u32) -> &'static str {
    match cat {
        c if c == cat::BOOT => "boot",
        c if c == cat::TOKEN => "token",
        c if c == cat::WIDGET => "widget",
        c if c == cat::EXCHANGE => "exchange",
        _ => "misc",
    }
}

/// Parse a comma-separated category list into a mask.
pub fn parse_list(list: &str) -> u32 {
    let mut m: u32 = 0;
    for tok in list.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        match tok.as_str() {
            "" | "none" => m = 0,
            "all" => m = cat::ALL,
            "boot" => m |= cat::BOOT,
            "token" => m |= cat::TOKEN,
            "widget" => m |= cat::WIDGET,
            "exchange" => m |= cat::EXCHANGE,
            _ => {}
        }
    }
    m
}

#[inline]
pub fn set_from_list(list: &str) {
    set(parse_list(list));
}

#[cfg(target_arch = "wasm32")]
pub fn init_from_url_and_storage_once() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use web_sys::window;
        if let Some(win) = window() {
            // URL query: ?lkdebug=token,widget
            if let Ok(search) = win.location().search() {
                let qs = search.trim_start_matches('?');
                for part in qs.split('&') {
                    let mut it = part.splitn(2, '=');
                    let key = it.next().unwrap_or_default();
                    let val = it.next().unwrap_or_default();
                    if key.eq_ignore_ascii_case("lkdebug") {
                        let val = val.replace('+', " ");
                        if let Ok(decoded_js) = js_sys::decode_uri_component(&val) {
                            let decoded = decoded_js.as_string().unwrap_or_default();
                            set_from_list(&decoded);
                        }
                    }
                }
            }
            // localStorage wins over the URL when both are present
            if let Ok(Some(storage)) = win.local_storage() {
                if let Ok(Some(v)) = storage.get_item("linkglue.debug") {
                    set_from_list(&v);
                }
            }
        }
        log(cat::BOOT, "debug init (wasm) complete");
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_from_url_and_storage_once() {
    if let Ok(v) = std::env::var("LINK_DEBUG") {
        set_from_list(&v);
    }
}

/// Log target for category output; the mask is the filter, so lines go out at info.
pub const TARGET: &str = "linkglue::debug";

#[inline]
pub fn log(cat: u32, msg: impl AsRef<str>) {
    if !is(cat) {
        return;
    }
    log::info!(target: TARGET, "[linkglue][{}] {}", cat_name(cat), msg.as_ref());
}
