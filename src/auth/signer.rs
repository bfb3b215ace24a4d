// ABOUTME: HTTP request signing with an API signing key (rsa-sha256 signature scheme).
// ABOUTME: Produces the date, host, body digest, and Authorization headers for a request.

use chrono::Utc;
use openssl::base64;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::sha::sha256;
use openssl::sign::Signer;
use reqwest::Url;

/// Headers covered by the signature for requests without a body.
const GENERIC_HEADERS: [&str; 3] = ["date", "(request-target)", "host"];
/// Extra headers covered when a JSON body is signed.
const BODY_HEADERS: [&str; 3] = ["content-length", "content-type", "x-content-sha256"];

/// Whether the request body takes part in the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySigning<'a> {
    /// GET and similar requests.
    None,
    /// JSON bodies: length, type and digest are signed.
    Json(&'a [u8]),
    /// Streamed binary uploads: the body is sent but not covered.
    Excluded,
}

/// Signs requests on behalf of one API user.
pub struct RequestSigner {
    key_id: String,
    key: PKey<Private>,
    region_id: Option<String>,
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .field("region_id", &self.region_id)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// `key_id` is `<tenancy>/<user>/<fingerprint>`.
    pub fn new(key_id: impl Into<String>, key: PKey<Private>) -> Self {
        Self {
            key_id: key_id.into(),
            key,
            region_id: None,
        }
    }

    pub fn with_region(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = Some(region_id.into());
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Home region of the credentials, if configured.
    pub fn region_id(&self) -> Option<&str> {
        self.region_id.as_deref()
    }

    /// Compute the headers to attach to a request, `Authorization` last.
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        body: BodySigning<'_>,
    ) -> Result<Vec<(String, String)>, openssl::error::ErrorStack> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        self.sign_at(method, url, body, &date)
    }

    fn sign_at(
        &self,
        method: &str,
        url: &Url,
        body: BodySigning<'_>,
        date: &str,
    ) -> Result<Vec<(String, String)>, openssl::error::ErrorStack> {
        let host = match url.port() {
            Some(port) => format!("{}:{}", url.host_str().unwrap_or_default(), port),
            None => url.host_str().unwrap_or_default().to_string(),
        };
        let target = match url.query() {
            Some(q) => format!("{} {}?{}", method.to_lowercase(), url.path(), q),
            None => format!("{} {}", method.to_lowercase(), url.path()),
        };

        let mut headers = vec![
            ("date".to_string(), date.to_string()),
            ("(request-target)".to_string(), target),
            ("host".to_string(), host),
        ];
        if let BodySigning::Json(bytes) = body {
            headers.push(("content-length".to_string(), bytes.len().to_string()));
            headers.push(("content-type".to_string(), "application/json".to_string()));
            headers.push((
                "x-content-sha256".to_string(),
                base64::encode_block(&sha256(bytes)),
            ));
        }

        let signing_string = headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut signer = Signer::new(MessageDigest::sha256(), &self.key)?;
        signer.update(signing_string.as_bytes())?;
        let signature = base64::encode_block(&signer.sign_to_vec()?);

        let signed_headers: Vec<&str> = match body {
            BodySigning::Json(_) => GENERIC_HEADERS.iter().chain(BODY_HEADERS.iter()).copied().collect(),
            _ => GENERIC_HEADERS.to_vec(),
        };
        let authorization = format!(
            r#"Signature version="1",keyId="{}",algorithm="rsa-sha256",headers="{}",signature="{}""#,
            self.key_id,
            signed_headers.join(" "),
            signature
        );

        // (request-target) is a pseudo-header and host is set by the client
        headers.retain(|(name, _)| name != "(request-target)" && name != "host");
        headers.push(("authorization".to_string(), authorization));
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::rsa::Rsa;
    use openssl::sign::Verifier;

    fn signer() -> RequestSigner {
        let rsa = Rsa::generate(2048).unwrap();
        RequestSigner::new("tenancy/user/aa:bb", PKey::from_rsa(rsa).unwrap())
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> &'a str {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn get_signs_generic_headers_only() {
        let signer = signer();
        let url = Url::parse("https://devops.example.com/20210630/deployments/d1").unwrap();
        let headers = signer.sign("GET", &url, BodySigning::None).unwrap();

        let auth = header(&headers, "authorization");
        assert!(auth.contains(r#"keyId="tenancy/user/aa:bb""#));
        assert!(auth.contains(r#"headers="date (request-target) host""#));
        assert!(headers.iter().all(|(n, _)| n != "x-content-sha256"));
    }

    #[test]
    fn json_body_adds_digest_headers() {
        let signer = signer();
        let url = Url::parse("https://devops.example.com/20210630/deployments").unwrap();
        let body = br#"{"a":"b"}"#;
        let headers = signer.sign("POST", &url, BodySigning::Json(body)).unwrap();

        assert_eq!(header(&headers, "content-length"), "9");
        assert_eq!(
            header(&headers, "x-content-sha256"),
            base64::encode_block(&sha256(body))
        );
        assert!(header(&headers, "authorization").contains(
            r#"headers="date (request-target) host content-length content-type x-content-sha256""#
        ));
    }

    #[test]
    fn signature_verifies_against_public_key() {
        let signer = signer();
        let url = Url::parse("https://devops.example.com:8443/x?y=1").unwrap();
        let date = "Tue, 07 Jun 2022 20:51:35 GMT";
        let headers = signer.sign_at("GET", &url, BodySigning::None, date).unwrap();

        let auth = header(&headers, "authorization");
        let signature = auth
            .split("signature=\"")
            .nth(1)
            .and_then(|s| s.strip_suffix('"'))
            .unwrap();
        let signature = base64::decode_block(signature).unwrap();

        let expected = format!(
            "date: {date}\n(request-target): get /x?y=1\nhost: devops.example.com:8443"
        );
        let mut verifier = Verifier::new(MessageDigest::sha256(), &signer.key).unwrap();
        verifier.update(expected.as_bytes()).unwrap();
        assert!(verifier.verify(&signature).unwrap());
    }
}
