use decision_matrix::decision::codec::unescape_field;
use decision_matrix::decision::DATA_PARAM;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Accept either a bare model string or a pasted share link and return the model string.
pub(crate) fn data_from_input(raw: &str) -> String {
    let raw = raw.trim();
    let Some((_, query)) = raw.split_once('?') else {
        return raw.to_string();
    };

    let prefix = format!("{DATA_PARAM}=");
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))
        .map(|value| unescape_field(&value.replace('+', " ")).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_model_strings_pass_through() {
        assert_eq!(data_from_input(" 0~Price~2.0____ "), "0~Price~2.0____");
    }

    #[test]
    fn share_links_are_unwrapped() {
        let link = "http://127.0.0.1:3000/?lang=en&data=0~Price~2.0__1~A__1-0~8.0%200~8.0";
        assert_eq!(data_from_input(link), "0~Price~2.0__1~A__1-0~8.0 0~8.0");
    }

    #[test]
    fn links_without_data_yield_an_empty_model() {
        assert_eq!(data_from_input("http://127.0.0.1:3000/?lang=en"), "");
    }
}
