use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// True when `RISI_QUIET` asks for banners to be suppressed
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("RISI_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}
