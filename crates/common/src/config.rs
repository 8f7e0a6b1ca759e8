use once_cell::sync::OnceCell;

static GLOBAL_CONFIG: OnceCell<GlobalConfig> = OnceCell::new();

#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalConfig {
    pub verbose: bool,
}

pub fn init_global_config(config: GlobalConfig) {
    GLOBAL_CONFIG
        .set(config)
        .expect("Global config is already initialized");
}

pub fn global_config() -> GlobalConfig {
    GLOBAL_CONFIG.get().copied().unwrap_or_default()
}
