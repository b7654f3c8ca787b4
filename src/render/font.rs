use crate::error::{EdaError, Result};
use once_cell::sync::OnceCell;
use plotters::style::{register_font, FontStyle};
use tracing::debug;

/// Family every chart asks for.
pub const FAMILY: &str = "sans-serif";

const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

static REGISTERED: OnceCell<std::result::Result<(), String>> = OnceCell::new();

/// Register the embedded font with plotters. Safe to call repeatedly; only
/// the first call does any work.
pub fn ensure_registered() -> Result<()> {
    REGISTERED
        .get_or_init(|| {
            debug!(family = FAMILY, bytes = DEJAVU_SANS.len(), "registering embedded font");
            register_font(FAMILY, FontStyle::Normal, DEJAVU_SANS)
                .map_err(|_| "invalid font data".to_string())
        })
        .clone()
        .map_err(|e| EdaError::Config(format!("embedded font rejected: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_idempotent() {
        assert!(ensure_registered().is_ok());
        assert!(ensure_registered().is_ok());
    }
}
