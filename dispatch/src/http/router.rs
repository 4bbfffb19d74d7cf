use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION, CONTENT_TYPE};
use reqwest::Method;
use std::sync::Arc;

use super::transport::HttpRequest;
use crate::codec::WireCodec;
use crate::constants::headers::{DMR_ENCODED, KEEP_ALIVE};
use crate::constants::model::{
    COMPOSITE, READ_RESOURCE_DESCRIPTION_OPERATION, READ_RESOURCE_DESCRIPTION_OPTIONAL_PARAMETERS,
    RESOURCE_DESCRIPTION,
};
use crate::errors::DispatchError;
use crate::model::Operation;

/// Characters left untouched when encoding a complete URL: the reserved and
/// unreserved URI characters.
const URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Decides method, URL, headers and body for an operation.
///
/// `read-resource-description` is answered by a cacheable GET on the
/// resource's URL; everything else is POSTed as an encoded payload to the
/// management endpoint.
pub struct RequestRouter {
    description_base: String,
    post_template: HttpRequest,
    codec: Arc<dyn WireCodec>,
}

impl RequestRouter {
    pub fn new(endpoint_url: &str, codec: Arc<dyn WireCodec>) -> Self {
        let mut headers = dmr_headers();
        headers.insert(CONNECTION, HeaderValue::from_static(KEEP_ALIVE));

        // Built once per router. Each POST clones it, so the transport owns
        // an independent copy of every submitted request.
        let post_template = HttpRequest {
            method: Method::POST,
            url: endpoint_url.to_string(),
            headers,
            body: None,
            include_credentials: true,
        };

        Self {
            description_base: endpoint_url.trim_end_matches('/').to_string(),
            post_template,
            codec,
        }
    }

    pub fn route(&self, operation: &Operation) -> Result<HttpRequest, DispatchError> {
        if operation.name() == COMPOSITE && !operation.is_composite() {
            return Err(DispatchError::Encoding {
                reason: "Composite operation requires at least one step".to_string(),
            });
        }

        if operation.name() == READ_RESOURCE_DESCRIPTION_OPERATION {
            Ok(HttpRequest {
                method: Method::GET,
                url: self.description_url(operation),
                headers: dmr_headers(),
                body: None,
                include_credentials: true,
            })
        } else {
            let mut request = self.post_template.clone();
            request.body = Some(self.codec.encode_to_base64(operation)?);
            Ok(request)
        }
    }

    /// `<endpoint>/<name>/<value>/...?operation=resource-description[&param=value...]`
    pub fn description_url(&self, operation: &Operation) -> String {
        let mut url = self.description_base.clone();
        for (name, value) in operation.address().segments() {
            url.push('/');
            url.push_str(name);
            url.push('/');
            url.push_str(value);
        }

        url.push_str("?operation=");
        url.push_str(RESOURCE_DESCRIPTION);
        for parameter in READ_RESOURCE_DESCRIPTION_OPTIONAL_PARAMETERS {
            if operation.has_parameter(parameter) {
                url.push('&');
                url.push_str(parameter);
                url.push('=');
                url.push_str(&operation.parameter_as_string(parameter).unwrap_or_default());
            }
        }

        utf8_percent_encode(&url, URL_ENCODE_SET).to_string()
    }
}

fn dmr_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(DMR_ENCODED));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(DMR_ENCODED));
    headers
}
