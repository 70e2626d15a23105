use tracing::{error, info};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_rates_mock_server(base: &str, response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v6/latest/{base}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(response)
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(file: &tempfile::NamedTempFile, base_url: &str) {
        let config_content = format!(
            r#"
            base_currency: "USD"
            providers:
              open_er_api:
                base_url: {base_url}
            request_timeout_secs: 5
        "#
        );
        std::fs::write(file.path(), config_content).expect("Failed to write config file");
    }
}

const RATES_RESPONSE: &str = r#"{
    "result": "success",
    "base_code": "USD",
    "time_last_update_unix": 1760659201,
    "time_next_update_unix": 1760745601,
    "rates": { "USD": 1, "EUR": 0.9, "JPY": 150 }
}"#;

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock() {
    let mock_server = test_utils::create_rates_mock_server(
        "USD",
        wiremock::ResponseTemplate::new(200).set_body_string(RATES_RESPONSE),
    )
    .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxc::run_command(
        fxc::AppCommand::Convert {
            amount: "100".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_rates_flow_with_mock() {
    let mock_server = test_utils::create_rates_mock_server(
        "USD",
        wiremock::ResponseTemplate::new(200).set_body_string(RATES_RESPONSE),
    )
    .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result =
        fxc::run_command(fxc::AppCommand::Rates, Some(config_file.path().to_str().unwrap())).await;
    assert!(result.is_ok(), "Rates command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_convert_rejects_unknown_currency() {
    let mock_server = test_utils::create_rates_mock_server(
        "USD",
        wiremock::ResponseTemplate::new(200).set_body_string(RATES_RESPONSE),
    )
    .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxc::run_command(
        fxc::AppCommand::Convert {
            amount: "10".to_string(),
            from: "XXX".to_string(),
            to: "EUR".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Unknown currency should fail");
    assert_eq!(
        err.downcast_ref::<fxc::core::ConversionError>(),
        Some(&fxc::core::ConversionError::RateUnavailable(
            "XXX".to_string()
        ))
    );
}

#[test_log::test(tokio::test)]
async fn test_convert_fails_when_rates_cannot_load() {
    let mock_server = test_utils::create_rates_mock_server(
        "USD",
        wiremock::ResponseTemplate::new(503),
    )
    .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxc::run_command(
        fxc::AppCommand::Convert {
            amount: "10".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Failed rate load should fail the command");
    assert_eq!(err.to_string(), "Exchange rates could not be loaded");
    assert!(format!("{err:#}").contains("HTTP error: 503 Service Unavailable"));
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_reported() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("absent.yaml");

    let result =
        fxc::run_command(fxc::AppCommand::Rates, Some(missing.to_str().unwrap())).await;

    let err = result.expect_err("Missing config should fail");
    assert!(err.to_string().contains("Failed to read config file"));
    assert!(!missing.exists());
}

#[test_log::test(tokio::test)]
#[ignore = "requires network access"]
async fn test_real_open_er_api() {
    use fxc::core::RateTableProvider;
    use fxc::providers::OpenErApiProvider;

    let provider = OpenErApiProvider::new(
        fxc::core::config::DEFAULT_OPEN_ER_API_URL,
        Some(std::time::Duration::from_secs(10)),
    );

    info!("Fetching exchange rates from open.er-api.com");
    match provider.fetch_rates("USD").await {
        Ok(table) => {
            info!(rates = table.len(), "Received successful rates response");
            assert_eq!(table.base(), "USD");
            for code in fxc::core::currency::SUPPORTED_CURRENCIES {
                let rate = table.rate(code);
                assert!(
                    rate.is_some_and(|r| r > 0.0),
                    "{code} should have a positive rate"
                );
            }
        }
        Err(e) => {
            error!("Rates API request failed: {e}\n{e:?}");
            panic!("Rates API request failed: {e}");
        }
    }
}
