use crate::domain::model::EndpointDescriptor;
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{
    validate_header_name, validate_header_value, validate_url, Validate,
};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;

/// 啟動時載入一次的端點清單
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointList {
    endpoints: Vec<EndpointDescriptor>,
}

impl EndpointList {
    pub fn new(endpoints: Vec<EndpointDescriptor>) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(MonitorError::InvalidInput {
                message: "endpoint list is empty".to_string(),
            });
        }
        Ok(Self { endpoints })
    }

    /// 從檔案載入，`.json` 以 JSON 解析，其餘一律視為 YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(MonitorError::IoError)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let list = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        tracing::debug!("Loaded {} endpoints from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        if processed.trim().is_empty() {
            return Self::new(Vec::new());
        }

        let endpoints: Option<Vec<EndpointDescriptor>> =
            serde_yaml::from_str(&processed).map_err(|e| MonitorError::InvalidInput {
                message: format!("YAML parsing error: {}", e),
            })?;
        Self::new(endpoints.unwrap_or_default())
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        let endpoints: Vec<EndpointDescriptor> =
            serde_json::from_str(&processed).map_err(|e| MonitorError::InvalidInput {
                message: format!("JSON parsing error: {}", e),
            })?;
        Self::new(endpoints)
    }

    pub fn endpoints(&self) -> &[EndpointDescriptor] {
        &self.endpoints
    }

    pub fn into_endpoints(self) -> Vec<EndpointDescriptor> {
        self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl Validate for EndpointList {
    fn validate(&self) -> Result<()> {
        for (index, endpoint) in self.endpoints.iter().enumerate() {
            validate_url(&format!("endpoints[{}].url", index), &endpoint.url)?;
            let field = format!("endpoints[{}].headers", index);
            for (name, value) in &endpoint.headers {
                validate_header_name(&field, name)?;
                validate_header_value(&field, value)?;
            }
        }
        Ok(())
    }
}

/// 替換環境變數 (例如 ${API_TOKEN})，找不到的保持原樣
fn substitute_env_vars(content: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
    });

    re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str) -> NamedTempFile {
        Builder::new().suffix(suffix).tempfile().unwrap()
    }

    const SAMPLE_YAML: &str = r#"
- headers:
    user-agent: fetch-synthetic-monitor
  method: GET
  name: fetch index page
  url: https://fetch.com/
- name: fetch careers page
  url: https://fetch.com/careers
- body: '{"foo":"bar"}'
  headers:
    content-type: application/json
  method: POST
  name: fetch some fake post endpoint
  url: https://fetch.com/some/post/endpoint
- name: fetch rewards index page
  url: https://www.fetchrewards.com/
"#;

    #[test]
    fn test_parse_yaml_endpoints() {
        let list = EndpointList::from_yaml_str(SAMPLE_YAML).unwrap();
        assert_eq!(list.len(), 4);

        let first = &list.endpoints()[0];
        assert_eq!(first.name.as_deref(), Some("fetch index page"));
        assert_eq!(
            first.headers.get("user-agent").map(String::as_str),
            Some("fetch-synthetic-monitor")
        );

        let careers = &list.endpoints()[1];
        assert_eq!(careers.method, "GET");
        assert!(careers.headers.is_empty());

        let post = &list.endpoints()[2];
        assert_eq!(post.method, "POST");
        assert_eq!(post.body.as_deref(), Some(r#"{"foo":"bar"}"#));

        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_empty_sources_are_invalid_input() {
        for content in ["", "   \n", "[]", "~"] {
            let result = EndpointList::from_yaml_str(content);
            assert!(
                matches!(result, Err(MonitorError::InvalidInput { .. })),
                "expected invalid input for {:?}",
                content
            );
        }
    }

    #[test]
    fn test_unparsable_yaml_is_invalid_input() {
        let result = EndpointList::from_yaml_str("- url: [unclosed");
        assert!(matches!(result, Err(MonitorError::InvalidInput { .. })));

        // 缺少必要欄位 url
        let result = EndpointList::from_yaml_str("- name: no url here");
        assert!(matches!(result, Err(MonitorError::InvalidInput { .. })));
    }

    #[test]
    fn test_parse_json_endpoints() {
        let list = EndpointList::from_json_str(concat!(
            r#"[{"url": "https://fetch.com/"}, "#,
            r#"{"url": "http://localhost:9000/x", "method": "head"}]"#,
        ))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.endpoints()[1].method, "head");
    }

    #[test]
    fn test_validation_rejects_bad_url_and_header() {
        let list = EndpointList::from_yaml_str("- url: fetch.com/no-scheme").unwrap();
        assert!(matches!(
            list.validate(),
            Err(MonitorError::InvalidConfigValueError { .. })
        ));

        let list = EndpointList::from_yaml_str(
            "- url: https://fetch.com/\n  headers:\n    \"bad header\": x\n",
        )
        .unwrap();
        assert!(list.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_header_value_with_newline() {
        // YAML 雙引號字串中的 \n 會變成真正的換行
        let list = EndpointList::from_yaml_str(
            "- url: https://fetch.com/\n  headers:\n    x: \"a\\nb\"\n",
        )
        .unwrap();
        assert_eq!(list.endpoints()[0].headers["x"], "a\nb");
        assert!(matches!(
            list.validate(),
            Err(MonitorError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SMALL_UPTIME_TEST_TOKEN", "secret-token");

        let list = EndpointList::from_yaml_str(concat!(
            "- url: https://fetch.com/\n",
            "  headers:\n",
            "    authorization: Bearer ${SMALL_UPTIME_TEST_TOKEN}\n",
            "    x-missing: ${SMALL_UPTIME_TEST_UNSET}\n",
        ))
        .unwrap();

        let headers = &list.endpoints()[0].headers;
        assert_eq!(headers["authorization"], "Bearer secret-token");
        assert_eq!(headers["x-missing"], "${SMALL_UPTIME_TEST_UNSET}");

        std::env::remove_var("SMALL_UPTIME_TEST_TOKEN");
    }

    #[test]
    fn test_from_file_dispatches_on_extension() {
        let mut yaml = temp_file(".yaml");
        write!(yaml, "{}", SAMPLE_YAML).unwrap();
        assert_eq!(EndpointList::from_file(yaml.path()).unwrap().len(), 4);

        let mut json = temp_file(".json");
        write!(json, r#"[{{"url": "https://fetch.com/"}}]"#).unwrap();
        assert_eq!(EndpointList::from_file(json.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EndpointList::from_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(MonitorError::IoError(_))));
    }
}
