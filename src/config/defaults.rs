use crate::config::Settings;

pub struct DefaultConfig;

impl DefaultConfig {
    pub fn create_default_config_file() -> String {
        r#"# predictor configuration

[service]
# Address of the prediction service; predict_path and health_path are joined onto it
base_url = "http://127.0.0.1:8000"
predict_path = "/predict"
health_path = "/health"
timeout_secs = 30

[output]
use_colors = true
pretty_json = true
"#
        .to_string()
    }

    pub fn get_default_settings() -> Settings {
        Settings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_matches_defaults() {
        let parsed: Settings = toml::from_str(&DefaultConfig::create_default_config_file()).unwrap();
        let defaults = DefaultConfig::get_default_settings();
        assert_eq!(parsed.service.base_url, defaults.service.base_url);
        assert_eq!(parsed.service.predict_path, defaults.service.predict_path);
        assert_eq!(parsed.service.health_path, defaults.service.health_path);
        assert_eq!(parsed.service.timeout_secs, defaults.service.timeout_secs);
        assert_eq!(parsed.output.use_colors, defaults.output.use_colors);
        assert_eq!(parsed.output.pretty_json, defaults.output.pretty_json);
    }
}
