use std::sync::Arc;

/// Window features for the consent popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupFeatures {
    pub width: u32,
    pub height: u32,
    pub popup: bool,
    pub scrollbars: bool,
}

impl PopupFeatures {
    pub const OAUTH: PopupFeatures = PopupFeatures {
        width: 500,
        height: 600,
        popup: true,
        scrollbars: true,
    };

    /// Rendered in `window.open` feature-string form.
    pub fn to_feature_string(&self) -> String {
        format!(
            "width={},height={},popup={},scrollbars={}",
            self.width,
            self.height,
            yes_no(self.popup),
            yes_no(self.scrollbars)
        )
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// A child window opened by a [`PopupLauncher`]. The handshake never closes it.
pub trait PopupHandle: Send + Sync {
    fn is_closed(&self) -> bool;
}

/// Host-side window opener (a webview bridge, a desktop shell, a test double).
pub trait PopupLauncher: Send + Sync {
    /// `None` means the host refused to open the window, e.g. a popup blocker.
    fn open(&self, url: &str, target: &str, features: &PopupFeatures)
        -> Option<Arc<dyn PopupHandle>>;
}
