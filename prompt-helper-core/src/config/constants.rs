/// Default values shared by the config loader and the CLI
pub mod defaults {
    pub const PRESETS_DIR: &str = "presets";
    pub const CONFIG_FILE_NAME: &str = "prompt-helper.toml";
    pub const DOT_DIR: &str = ".prompt-helper";
    pub const LOG_FILTER: &str = "warn";
}

