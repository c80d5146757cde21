//! Request URLs for the OpenWeather geocoding endpoints.
//!
//! Both endpoints are queried for US locations only.

use geoloc_core::Config;

const COUNTRY_CODE: &str = "US";
const KEY_PARAM: &str = "appid=";

#[derive(Debug, Clone)]
pub struct UrlBuilder {
    api_key: String,
    base_url_zip: String,
    base_url_direct: String,
}

impl UrlBuilder {
    pub fn new(
        api_key: impl Into<String>,
        base_url_zip: impl Into<String>,
        base_url_direct: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url_zip: base_url_zip.into(),
            base_url_direct: base_url_direct.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.openweather_api_key.clone(),
            config.base_url_zip.clone(),
            config.base_url_direct.clone(),
        )
    }

    /// `{base}?zip={code},US&appid={key}`
    pub fn zip_url(&self, code: &str) -> String {
        format!(
            "{}?zip={},{}&appid={}",
            self.base_url_zip, code, COUNTRY_CODE, self.api_key
        )
    }

    /// `{base}?q={city},{state},US&limit=1&appid={key}`
    pub fn direct_url(&self, city: &str, state: &str) -> String {
        format!(
            "{}?q={},{},{}&limit=1&appid={}",
            self.base_url_direct, city, state, COUNTRY_CODE, self.api_key
        )
    }

    /// Copy of `url` with the `appid` query value masked, for logging.
    pub fn redact(&self, url: &str) -> String {
        let Some((base, query)) = url.split_once('?') else {
            return url.to_string();
        };

        let query = query
            .split('&')
            .map(|pair| {
                if pair.starts_with(KEY_PARAM) {
                    format!("{}***", KEY_PARAM)
                } else {
                    pair.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", base, query)
    }
}
