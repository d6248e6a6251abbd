// DynamoDB JSON API client
// Using AWS Signature Version 4 request signing

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use serde_json::{json, Map, Number, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::store::StatsStore;
use crate::models::player::{fields, RawRecord};
use crate::utils::config::{AwsCredentials, DynamoConfig};

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "dynamodb";
const TARGET_PREFIX: &str = "DynamoDB_20120810";
const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// DynamoDB client for the player stats table
pub struct DynamoClient {
    client: Client,
    config: DynamoConfig,
    endpoint: Url,
    host: String,
}

impl DynamoClient {
    /// Create a new client; the endpoint is resolved from config
    pub fn new(client: Client, config: DynamoConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid DynamoDB endpoint: {}", config.endpoint))?;
        let host = host_header(&endpoint)?;

        Ok(Self {
            client,
            config,
            endpoint,
            host,
        })
    }

    /// Signed POST of one DynamoDB operation
    async fn call(&self, operation: &str, body: &Value) -> Result<Value> {
        let payload = serde_json::to_string(body)?;
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        let signed = sign_request(
            &self.config.credentials,
            &self.config.region,
            &self.host,
            &target,
            &payload,
            Utc::now(),
        )?;

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.config.timeout)
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", &target)
            .header("x-amz-date", &signed.amz_date)
            .header("authorization", &signed.authorization);
        if let Some(token) = &self.config.credentials.session_token {
            request = request.header("x-amz-security-token", token);
        }

        let response = request
            .body(payload)
            .send()
            .await
            .with_context(|| format!("DynamoDB {} request failed", operation))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!("DynamoDB error: {}", body);
            let kind = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["__type"].as_str().map(str::to_string))
                .unwrap_or_default();
            return Err(anyhow!("DynamoDB {} error: {} {}", operation, status, kind));
        }

        let result: Value = response.json().await?;
        Ok(result)
    }

    /// Get one item by username
    pub async fn get_item(&self, username: &str) -> Result<Option<Value>> {
        let mut key = Map::new();
        key.insert(fields::USERNAME.to_string(), json!({ "S": username }));

        let body = json!({
            "TableName": &self.config.table,
            "Key": key,
            "ConsistentRead": true
        });

        let result = self.call("GetItem", &body).await?;
        Ok(result.get("Item").map(from_item))
    }

    /// Put (fully replace) one item
    pub async fn put_item(&self, item: &Value) -> Result<()> {
        let body = json!({
            "TableName": &self.config.table,
            "Item": to_item(item)
        });

        self.call("PutItem", &body).await?;
        Ok(())
    }

    /// Scan the whole table
    /// Follows LastEvaluatedKey until every page is read
    pub async fn scan_table(&self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut start_key: Option<Value> = None;
        let mut pages = 0;

        loop {
            let mut body = json!({ "TableName": &self.config.table });
            if let Some(key) = start_key.take() {
                body["ExclusiveStartKey"] = key;
            }

            let result = self.call("Scan", &body).await?;
            pages += 1;

            if let Some(arr) = result["Items"].as_array() {
                items.extend(arr.iter().map(from_item));
            }

            // Check for next page
            match result.get("LastEvaluatedKey") {
                Some(key) if key.is_object() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!("Scanned {} items in {} page(s)", items.len(), pages);
        Ok(items)
    }
}

#[async_trait]
impl StatsStore for DynamoClient {
    async fn get(&self, username: &str) -> Result<Option<RawRecord>> {
        self.get_item(username).await
    }

    async fn put(&self, username: &str, mut record: RawRecord) -> Result<()> {
        // The key attribute must match the item key
        if let Some(obj) = record.as_object_mut() {
            obj.insert(fields::USERNAME.to_string(), json!(username));
        }
        self.put_item(&record).await
    }

    async fn scan_all(&self) -> Result<Vec<RawRecord>> {
        self.scan_table().await
    }
}

// ============ Request signing ============

/// Headers produced by signing a request
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub amz_date: String,
    pub authorization: String,
}

/// Sign a DynamoDB POST to "/" with AWS Signature Version 4
pub fn sign_request(
    credentials: &AwsCredentials,
    region: &str,
    host: &str,
    target: &str,
    payload: &str,
    now: DateTime<Utc>,
) -> Result<SignedHeaders> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = now.format("%Y%m%d").to_string();

    // Canonical headers, lowercase and sorted by name
    let mut headers = vec![
        ("content-type", CONTENT_TYPE.to_string()),
        ("host", host.to_string()),
        ("x-amz-date", amz_date.clone()),
    ];
    if let Some(token) = &credentials.session_token {
        headers.push(("x-amz-security-token", token.clone()));
    }
    headers.push(("x-amz-target", target.to_string()));

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "POST\n/\n\n{}\n{}\n{}",
        canonical_headers,
        signed_headers,
        sha256_hex(payload.as_bytes())
    );

    let scope = format!("{}/{}/{}/aws4_request", date_stamp, region, SERVICE);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        amz_date,
        scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let key = signing_key(&credentials.secret_access_key, &date_stamp, region, SERVICE)?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);

    Ok(SignedHeaders {
        authorization: format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            credentials.access_key_id, scope, signed_headers, signature
        ),
        amz_date,
    })
}

/// Derive the SigV4 signing key for a date, region and service
pub fn signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let k_date = hmac_sha256(format!("AWS4{}", secret).as_bytes(), date_stamp.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| anyhow!("HMAC key error: {}", e))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Host header value, with the port only when it is not the scheme default
fn host_header(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("DynamoDB endpoint has no host: {}", url))?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

// ============ Attribute values ============

/// Convert a DynamoDB item to regular JSON
fn from_item(item: &Value) -> Value {
    from_attribute_value(&json!({ "M": item }))
}

/// Convert a DynamoDB attribute value to a regular JSON value
fn from_attribute_value(value: &Value) -> Value {
    if let Some(s) = value.get("S") {
        return s.clone();
    }
    if let Some(n) = value.get("N").and_then(|n| n.as_str()) {
        return number_value(n);
    }
    if let Some(b) = value.get("BOOL") {
        return b.clone();
    }
    if value.get("NULL").is_some() {
        return Value::Null;
    }
    if let Some(arr) = value.get("L").and_then(|v| v.as_array()) {
        return Value::Array(arr.iter().map(from_attribute_value).collect());
    }
    if let Some(obj) = value.get("M").and_then(|m| m.as_object()) {
        let map: Map<String, Value> = obj
            .iter()
            .map(|(k, v)| (k.clone(), from_attribute_value(v)))
            .collect();
        return Value::Object(map);
    }
    if let Some(arr) = value.get("SS").and_then(|v| v.as_array()) {
        return Value::Array(arr.clone());
    }
    if let Some(arr) = value.get("NS").and_then(|v| v.as_array()) {
        return Value::Array(
            arr.iter()
                .filter_map(|n| n.as_str())
                .map(number_value)
                .collect(),
        );
    }
    Value::Null
}

/// Numbers travel as strings; keep the string if it is not a JSON number
fn number_value(n: &str) -> Value {
    if let Ok(i) = n.parse::<i64>() {
        return Value::Number(i.into());
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(n.to_string()))
}

/// Convert a regular JSON object to DynamoDB item format
fn to_item(data: &Value) -> Value {
    if let Some(obj) = data.as_object() {
        let item: Map<String, Value> = obj
            .iter()
            .map(|(k, v)| (k.clone(), to_attribute_value(v)))
            .collect();
        Value::Object(item)
    } else {
        json!({})
    }
}

/// Convert a JSON value to DynamoDB attribute value format
fn to_attribute_value(value: &Value) -> Value {
    match value {
        Value::String(s) => json!({ "S": s }),
        Value::Number(n) => json!({ "N": n.to_string() }),
        Value::Bool(b) => json!({ "BOOL": b }),
        Value::Array(arr) => {
            let values: Vec<Value> = arr.iter().map(to_attribute_value).collect();
            json!({ "L": values })
        }
        Value::Object(obj) => {
            let map: Map<String, Value> = obj
                .iter()
                .map(|(k, v)| (k.clone(), to_attribute_value(v)))
                .collect();
            json!({ "M": map })
        }
        Value::Null => json!({ "NULL": true }),
    }
}
