pub struct Icons;

impl Icons {
    pub const RICE: &str = "🍚";
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const NEW: &str = "✨";
    pub const DEL: &str = "🗑️";
    pub const PACKAGE: &str = "📦";
    pub const EMPTY: &str = "∅";
}
