use serde::{Deserialize, Deserializer, Serialize};
use shared::{CommonError, Result};

/// A stored file as listed by the backend
///
/// Older rows can carry `null` for size, type and tags, so none of them
/// may fail the decode of a whole page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub file_type: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Details shown for a single file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// Body of the signed-URL request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlRequest {
    pub name: String,
    pub content_type: String,
}

/// Single-use write credential for one object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedWriteCredential {
    #[serde(rename = "uploadUrl")]
    pub upload_url: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CredentialFields {
    #[serde(rename = "uploadUrl", default)]
    upload_url: Option<String>,
    #[serde(rename = "filePath", default)]
    file_path: Option<String>,
}

/// Signed-URL response; the backend sends the fields either at the top
/// level or under `data`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignedUrlResponse {
    #[serde(flatten)]
    top: CredentialFields,
    #[serde(default)]
    data: Option<CredentialFields>,
    #[serde(default)]
    message: Option<String>,
}

impl SignedUrlResponse {
    /// Both fields are needed, each taken from the top level first. Without
    /// them the backend's message, if any, becomes the credential error.
    pub fn into_credential(self) -> Result<SignedWriteCredential> {
        let data = self.data.unwrap_or_default();
        let upload_url = non_empty(self.top.upload_url).or_else(|| non_empty(data.upload_url));
        let file_path = non_empty(self.top.file_path).or_else(|| non_empty(data.file_path));

        match (upload_url, file_path) {
            (Some(upload_url), Some(file_path)) => Ok(SignedWriteCredential {
                upload_url,
                file_path,
            }),
            _ => Err(CommonError::Credential(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Failed to get signed URL".to_string()),
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Metadata registered once the bytes are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFileRequest {
    pub name: String,
    pub path: String,
    pub mime_type: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub file_type: String,
}

/// Registration result carrying the durable identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredFile {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub file_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credential_at_top_level() {
        let response: SignedUrlResponse = serde_json::from_value(json!({
            "uploadUrl": "https://bucket.example.com/put?sig=1",
            "filePath": "uploads/a.png"
        }))
        .unwrap();

        let credential = response.into_credential().unwrap();
        assert_eq!(credential.upload_url, "https://bucket.example.com/put?sig=1");
        assert_eq!(credential.file_path, "uploads/a.png");
    }

    #[test]
    fn test_credential_under_data() {
        let response: SignedUrlResponse = serde_json::from_value(json!({
            "success": true,
            "data": {
                "uploadUrl": "https://bucket.example.com/put?sig=2",
                "filePath": "uploads/b.png"
            }
        }))
        .unwrap();

        assert_eq!(
            response.into_credential().unwrap().file_path,
            "uploads/b.png"
        );
    }

    #[test]
    fn test_incomplete_credential() {
        let response: SignedUrlResponse = serde_json::from_value(json!({
            "uploadUrl": "https://bucket.example.com/put"
        }))
        .unwrap();
        match response.into_credential() {
            Err(CommonError::Credential(message)) => assert_eq!(message, "Failed to get signed URL"),
            other => panic!("unexpected result: {:?}", other),
        }

        let response: SignedUrlResponse = serde_json::from_value(json!({
            "success": false,
            "message": "quota exceeded"
        }))
        .unwrap();
        match response.into_credential() {
            Err(CommonError::Credential(message)) => assert_eq!(message, "quota exceeded"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_file_record_tolerates_null_fields() {
        let record: FileRecord = serde_json::from_value(json!({
            "id": 4,
            "name": "draft.txt",
            "size": null,
            "type": null,
            "category": null,
            "tags": null
        }))
        .unwrap();

        assert_eq!(record.size, None);
        assert_eq!(record.file_type, "");
        assert!(record.tags.is_empty());

        let record: FileRecord = serde_json::from_value(json!({
            "id": 5,
            "name": "final.png",
            "size": 2048,
            "type": "png",
            "tags": ["q3"]
        }))
        .unwrap();

        assert_eq!(record.size, Some(2048));
        assert_eq!(record.tags, vec!["q3".to_string()]);
        assert_eq!(record.updated_at, None);
    }

    #[test]
    fn test_file_info_decoding() {
        let info: FileInfo = serde_json::from_value(json!({
            "file_name": "a.png",
            "content_type": "image/png",
            "uploaded_by": "ada@example.com",
            "uploaded_at": "2024-03-05T10:15:00Z"
        }))
        .unwrap();

        assert_eq!(info.file_name, "a.png");
        assert_eq!(info.size, None);
        assert_eq!(info.uploaded_by.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_register_request_wire_names() {
        let request = RegisterFileRequest {
            name: "a.png".to_string(),
            path: "uploads/a.png".to_string(),
            mime_type: "image/png".to_string(),
            size: 42,
            file_type: "png".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "a.png",
                "path": "uploads/a.png",
                "mime_type": "image/png",
                "size": 42,
                "type": "png"
            })
        );
    }
}
