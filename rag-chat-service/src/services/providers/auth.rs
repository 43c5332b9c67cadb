//! Request authentication for the managed AI runtimes.
//!
//! Requests are signed with SigV4 using credentials from the AWS default
//! provider chain (environment, profile, web identity, container or
//! instance role). A Bedrock API key, when configured, replaces signing
//! with a bearer token.

use super::ProviderError;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use reqwest::header::CONTENT_TYPE;
use reqwest::RequestBuilder;
use std::time::SystemTime;

/// Signing name shared by the Bedrock runtime and agent runtime APIs.
pub const BEDROCK_SIGNING_NAME: &str = "bedrock";

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Debug)]
pub enum Authentication {
    Bearer(String),
    SigV4(RequestSigner),
}

impl Authentication {
    /// Resolve the authentication for a deployment: the API key when set,
    /// otherwise SigV4 with the default credential chain.
    pub async fn resolve(api_key: Option<String>, region: &str) -> Result<Self, ProviderError> {
        match api_key {
            Some(key) => Ok(Authentication::Bearer(key)),
            None => Ok(Authentication::SigV4(RequestSigner::from_env(region).await?)),
        }
    }

    /// Attach the JSON body and the credentials to a POST request.
    pub async fn authorize(
        &self,
        builder: RequestBuilder,
        url: &str,
        body: Vec<u8>,
    ) -> Result<RequestBuilder, ProviderError> {
        let builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE);

        match self {
            Authentication::Bearer(key) => Ok(builder.bearer_auth(key).body(body)),
            Authentication::SigV4(signer) => {
                let headers = signer
                    .signed_headers("POST", url, &[("content-type", JSON_CONTENT_TYPE)], &body)
                    .await?;
                Ok(headers
                    .into_iter()
                    .fold(builder, |b, (name, value)| b.header(name, value))
                    .body(body))
            }
        }
    }
}

/// SigV4 signer bound to a region and a credentials provider.
#[derive(Clone, Debug)]
pub struct RequestSigner {
    region: String,
    service: &'static str,
    credentials: SharedCredentialsProvider,
}

impl RequestSigner {
    pub fn new(region: impl Into<String>, credentials: SharedCredentialsProvider) -> Self {
        Self {
            region: region.into(),
            service: BEDROCK_SIGNING_NAME,
            credentials,
        }
    }

    /// Signer backed by the AWS default credential chain.
    pub async fn from_env(region: &str) -> Result<Self, ProviderError> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        let credentials = sdk_config.credentials_provider().ok_or_else(|| {
            ProviderError::NotConfigured("no AWS credentials provider available".to_string())
        })?;

        tracing::info!(region = %region, "Using AWS default credential chain for request signing");
        Ok(Self::new(region, credentials))
    }

    /// Headers to add so the request carries a valid SigV4 signature
    /// (`authorization`, `x-amz-date` and, for temporary credentials,
    /// `x-amz-security-token`).
    pub async fn signed_headers(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<Vec<(String, String)>, ProviderError> {
        let credentials = self
            .credentials
            .provide_credentials()
            .await
            .map_err(|e| ProviderError::NotConfigured(format!("AWS credentials: {}", e)))?;
        let identity = credentials.into();

        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(self.service)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|e| ProviderError::Signing(e.to_string()))?
            .into();

        let request = SignableRequest::new(
            method,
            url,
            headers.iter().copied(),
            SignableBody::Bytes(body),
        )
        .map_err(|e| ProviderError::Signing(e.to_string()))?;

        let (instructions, _signature) = sign(request, &params)
            .map_err(|e| ProviderError::Signing(e.to_string()))?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use aws_credential_types::Credentials;
    use axum::http::HeaderMap;
    use std::sync::{Arc, Mutex};

    pub type RecordedHeaders = Arc<Mutex<Vec<HeaderMap>>>;

    /// Local stand-in for a runtime endpoint: answers every request with
    /// `reply` and records the request headers.
    pub async fn spawn_recording_runtime(reply: serde_json::Value) -> (String, RecordedHeaders) {
        let seen: RecordedHeaders = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let app = axum::Router::new().fallback(move |headers: HeaderMap| {
            let recorder = recorder.clone();
            let reply = reply.clone();
            async move {
                recorder.lock().unwrap().push(headers);
                axum::Json(reply)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), seen)
    }

    pub fn static_signer() -> RequestSigner {
        let credentials = Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            Some("session-token".to_string()),
            None,
            "static",
        );
        RequestSigner::new("us-west-2", SharedCredentialsProvider::new(credentials))
    }
}
