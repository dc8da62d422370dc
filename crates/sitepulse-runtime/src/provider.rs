//! Provider request builders
//!
//! Builds the concrete HTTP request for each measurement provider from a
//! work item. The core pipeline treats the result opaquely and hands it
//! to the transport layer.

use crate::error::{Result, RuntimeError};
use crate::eval::extract_domain;
use serde::Serialize;
use sitepulse_core::{Device, Provider, QueryMode, WorkItem};

const PSI_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
const CRUX_ENDPOINT: &str = "https://chromeuxreport.googleapis.com/v1/records:queryRecord";
const CRUX_HISTORY_ENDPOINT: &str =
    "https://chromeuxreport.googleapis.com/v1/records:queryHistoryRecord";
const GWF_ENDPOINT: &str = "https://api.thegreenwebfoundation.org/api/v3/greencheck/";

/// HTTP method of a built request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One request ready for the transport layer
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub url: String,
    pub method: HttpMethod,
    /// JSON body for POST requests
    pub body: Option<String>,
}

impl RequestSpec {
    fn get(url: String) -> Self {
        Self {
            url,
            method: HttpMethod::Get,
            body: None,
        }
    }

    fn post(url: String, body: String) -> Self {
        Self {
            url,
            method: HttpMethod::Post,
            body: Some(body),
        }
    }
}

#[derive(Serialize)]
struct CruxQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<&'a str>,
    #[serde(rename = "formFactor")]
    form_factor: &'a str,
}

/// Build the request for one work item.
///
/// `api_key` is required for the Google-hosted endpoints; the green-domain
/// check needs none.
pub fn build_request(
    provider: Provider,
    item: &WorkItem,
    api_key: Option<&str>,
) -> Result<RequestSpec> {
    if item.target.trim().is_empty() {
        return Err(RuntimeError::InvalidRequest(
            "target must be a non-empty string".to_string(),
        ));
    }

    match provider {
        Provider::PsiApi => psi_request(&item.target, item.device, api_key),
        // Accessibility and sustainability audits always run the mobile
        // strategy, whatever the row requested.
        Provider::Accessibility | Provider::Sustainability => {
            psi_request(&item.target, Device::Mobile, api_key)
        }
        Provider::Crux => crux_request(CRUX_ENDPOINT, item, api_key),
        Provider::CruxHistory => crux_request(CRUX_HISTORY_ENDPOINT, item, api_key),
        Provider::GreenDomain => {
            let domain = extract_domain(&item.target).ok_or_else(|| {
                RuntimeError::InvalidRequest(format!(
                    "cannot extract a domain from '{}'",
                    item.target
                ))
            })?;
            Ok(RequestSpec::get(format!("{}{}", GWF_ENDPOINT, domain)))
        }
    }
}

fn require_key(api_key: Option<&str>) -> Result<&str> {
    match api_key {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(RuntimeError::MissingApiKey),
    }
}

fn psi_request(target: &str, device: Device, api_key: Option<&str>) -> Result<RequestSpec> {
    let key = require_key(api_key)?;
    let mut url = format!(
        "{}?url={}&strategy={}&key={}",
        PSI_ENDPOINT,
        urlencoding::encode(target),
        device.as_str(),
        urlencoding::encode(key),
    );
    url.push_str(
        "&category=ACCESSIBILITY&category=BEST_PRACTICES&category=PERFORMANCE&category=PWA&category=SEO",
    );
    Ok(RequestSpec::get(url))
}

fn crux_request(endpoint: &str, item: &WorkItem, api_key: Option<&str>) -> Result<RequestSpec> {
    let key = require_key(api_key)?;
    let query = match item.mode {
        QueryMode::Url => CruxQuery {
            url: Some(&item.target),
            origin: None,
            form_factor: item.device.crux_form_factor(),
        },
        QueryMode::Origin => CruxQuery {
            url: None,
            origin: Some(&item.target),
            form_factor: item.device.crux_form_factor(),
        },
    };
    let body = serde_json::to_string(&query)
        .map_err(|e| RuntimeError::InvalidRequest(format!("cannot encode CrUX payload: {}", e)))?;
    Ok(RequestSpec::post(
        format!("{}?key={}", endpoint, urlencoding::encode(key)),
        body,
    ))
}
