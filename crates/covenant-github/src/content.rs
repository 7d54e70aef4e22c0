//! Decoding file content delivered by the contents API.

use base64::Engine;

use crate::error::GitHubError;
use crate::types::ContentResponse;

/// Extract the raw bytes of a file from a contents API response.
///
/// The API wraps base64 content at 60 columns; whitespace is stripped
/// before decoding.
///
/// # Errors
///
/// - [`GitHubError::NotAFile`] for directories, symlinks and submodules
/// - [`GitHubError::UnsupportedEncoding`] when content is not inline base64
/// - [`GitHubError::InvalidBase64`] when the content does not decode
pub fn decode_file(
    response: ContentResponse,
    requested_path: &str,
) -> Result<Vec<u8>, GitHubError> {
    let entry = match response {
        ContentResponse::Entry(entry) if entry.kind == "file" => entry,
        ContentResponse::Entry(_) | ContentResponse::Listing(_) => {
            return Err(GitHubError::NotAFile {
                path: requested_path.to_owned(),
            });
        }
    };

    let encoding = entry.encoding.as_deref().unwrap_or("none");
    let content = match (encoding, entry.content) {
        ("base64", Some(content)) => content,
        _ => {
            return Err(GitHubError::UnsupportedEncoding {
                path: entry.path,
                encoding: encoding.to_owned(),
            });
        }
    };

    decode_base64(&content)
}

/// Decode base64 text that may contain line breaks.
///
/// # Errors
///
/// Returns [`GitHubError::InvalidBase64`] if the text is not valid base64.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, GitHubError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentEntry;

    fn file(encoding: Option<&str>, content: Option<&str>) -> ContentResponse {
        ContentResponse::Entry(ContentEntry {
            kind: "file".to_owned(),
            path: "cla.yml".to_owned(),
            encoding: encoding.map(str::to_owned),
            content: content.map(str::to_owned),
        })
    }

    /// Encode like the contents API: standard base64 wrapped at 60 columns.
    fn api_encode(bytes: &[u8]) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
        let mut wrapped = String::new();
        for chunk in b64.as_bytes().chunks(60) {
            wrapped.push_str(std::str::from_utf8(chunk).expect("base64 is ASCII"));
            wrapped.push('\n');
        }
        wrapped
    }

    #[test]
    fn decodes_wrapped_base64() {
        let doc = "- alice\n- bob\n".repeat(20);
        let response = file(Some("base64"), Some(&api_encode(doc.as_bytes())));
        let bytes = decode_file(response, "cla.yml").expect("decode");
        assert_eq!(bytes, doc.as_bytes());
    }

    #[test]
    fn directory_listing_is_not_a_file() {
        let err = decode_file(ContentResponse::Listing(vec![]), ".github").unwrap_err();
        assert!(matches!(err, GitHubError::NotAFile { ref path } if path == ".github"));
    }

    #[test]
    fn symlink_is_not_a_file() {
        let response = ContentResponse::Entry(ContentEntry {
            kind: "symlink".to_owned(),
            path: "cla.yml".to_owned(),
            encoding: None,
            content: None,
        });
        let err = decode_file(response, "cla.yml").unwrap_err();
        assert!(matches!(err, GitHubError::NotAFile { .. }));
    }

    #[test]
    fn large_file_without_inline_content_is_rejected() {
        let err = decode_file(file(Some("none"), Some("")), "cla.yml").unwrap_err();
        assert!(
            matches!(err, GitHubError::UnsupportedEncoding { ref encoding, .. } if encoding == "none")
        );
    }

    #[test]
    fn missing_content_is_rejected() {
        let err = decode_file(file(Some("base64"), None), "cla.yml").unwrap_err();
        assert!(matches!(err, GitHubError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn corrupt_base64_is_rejected() {
        let err = decode_file(file(Some("base64"), Some("!!!not base64")), "cla.yml").unwrap_err();
        assert!(matches!(err, GitHubError::InvalidBase64(_)));
    }

    mod proptests {
        use super::*;
        use covenant_core::{Identity, SignerRegistry};
        use proptest::prelude::*;

        proptest! {
            /// Arbitrary bytes survive the API's wrapped base64 encoding.
            #[test]
            fn base64_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..2048)) {
                let decoded = decode_base64(&api_encode(&bytes)).unwrap();
                prop_assert_eq!(decoded, bytes);
            }

            /// A list of signers encoded as a YAML file in the repository
            /// decodes back to the same registry.
            #[test]
            fn registry_document_round_trip(
                names in prop::collection::vec("[A-Za-z0-9][A-Za-z0-9-]{0,38}", 0..40),
            ) {
                let yaml = serde_yaml::to_string(&names).unwrap();
                let response = file(Some("base64"), Some(&api_encode(yaml.as_bytes())));
                let bytes = decode_file(response, "cla.yml").unwrap();
                let registry = SignerRegistry::from_yaml(&bytes).unwrap();

                let mut expected: Vec<String> = names.clone();
                expected.sort();
                expected.dedup();
                let decoded: Vec<String> = registry.iter().map(Identity::to_string).collect();
                prop_assert_eq!(decoded, expected);
            }
        }

        #[test]
        fn null_document_round_trips_to_empty_registry() {
            let response = file(Some("base64"), Some(&api_encode(b"null\n")));
            let bytes = decode_file(response, "cla.yml").unwrap();
            assert!(SignerRegistry::from_yaml(&bytes).unwrap().is_empty());
        }
    }
}
