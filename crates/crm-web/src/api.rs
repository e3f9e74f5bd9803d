use crm_core::config::CrmConfig;
use crm_core::session::SessionState;
use crm_shared::store::{DataEnvelope, ListArgs};
use crm_shared::{CrmUserDoc, USER_DOCTYPE};
use gloo::net::http::{Request, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Frappe's `/api/method/*` responses wrap their payload in `message`.
#[derive(Deserialize)]
struct MethodEnvelope<T> {
    message: T,
}

/// Document store over Frappe's `/api/resource` REST routes.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentClient {
    base_url: String,
}

impl DocumentClient {
    pub fn new(config: &CrmConfig) -> Self {
        Self {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn resource_url(&self, doctype: &str, name: Option<&str>) -> String {
        let doctype = String::from(js_sys::encode_uri_component(doctype));
        match name {
            Some(name) => format!(
                "{}/api/resource/{doctype}/{}",
                self.base_url,
                String::from(js_sys::encode_uri_component(name))
            ),
            None => format!("{}/api/resource/{doctype}", self.base_url),
        }
    }

    pub async fn list<T>(&self, args: &ListArgs) -> Result<Vec<T>, String>
    where
        T: DeserializeOwned,
    {
        let pairs = args.to_query_pairs();
        let request = Request::get(&self.resource_url(&args.doctype, None))
            .query(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let envelope: DataEnvelope<Vec<T>> = send(request).await?;
        Ok(envelope.data)
    }

    pub async fn get<T>(&self, doctype: &str, name: &str) -> Result<T, String>
    where
        T: DeserializeOwned,
    {
        let request = Request::get(&self.resource_url(doctype, Some(name)));
        let envelope: DataEnvelope<T> = send(request).await?;
        Ok(envelope.data)
    }

    pub async fn create<T, B>(&self, doctype: &str, fields: &B) -> Result<T, String>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = Request::post(&self.resource_url(doctype, None))
            .json(fields)
            .map_err(|e| format!("failed to encode {doctype}: {e}"))?;
        let envelope: DataEnvelope<T> = decode(request.send().await).await?;
        Ok(envelope.data)
    }

    pub async fn update<T, B>(&self, doctype: &str, name: &str, fields: &B) -> Result<T, String>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = Request::put(&self.resource_url(doctype, Some(name)))
            .json(fields)
            .map_err(|e| format!("failed to encode {doctype} {name}: {e}"))?;
        let envelope: DataEnvelope<T> = decode(request.send().await).await?;
        Ok(envelope.data)
    }

    pub async fn delete(&self, doctype: &str, name: &str) -> Result<(), String> {
        let response = Request::delete(&self.resource_url(doctype, Some(name)))
            .send()
            .await
            .map_err(|e| format!("request error: {e}"))?;
        check_status(&response).await
    }

    pub async fn rename(&self, doctype: &str, old_name: &str, new_name: &str) -> Result<String, String> {
        let request = Request::post(&format!(
            "{}/api/method/frappe.client.rename_doc",
            self.base_url
        ))
        .json(&serde_json::json!({
            "doctype": doctype,
            "old_name": old_name,
            "new_name": new_name,
        }))
        .map_err(|e| format!("failed to encode rename: {e}"))?;
        let envelope: MethodEnvelope<String> = decode(request.send().await).await?;
        Ok(envelope.message)
    }

    /// Resolves the signed-in user and their CRM profile.
    pub async fn fetch_session(&self, config: &CrmConfig) -> Result<SessionState, String> {
        let request = Request::get(&format!(
            "{}/api/method/frappe.auth.get_logged_user",
            self.base_url
        ));
        let logged_user = match send::<MethodEnvelope<String>>(request).await {
            Ok(envelope) => envelope.message,
            Err(err) => {
                tracing::debug!(error = %err, "no logged-in user");
                return Ok(SessionState::Anonymous);
            }
        };

        let crm_user = match SessionState::resolve(Some(&logged_user), None, config) {
            SessionState::Loading => Some(self.get::<CrmUserDoc>(USER_DOCTYPE, &logged_user).await?),
            _ => None,
        };
        Ok(SessionState::resolve(Some(&logged_user), crm_user, config))
    }

    pub async fn login(&self, user: &str, password: &str) -> Result<(), String> {
        let request = Request::post(&format!("{}/api/method/login", self.base_url))
            .json(&serde_json::json!({ "usr": user, "pwd": password }))
            .map_err(|e| format!("failed to encode login: {e}"))?;
        let response = request
            .send()
            .await
            .map_err(|e| format!("request error: {e}"))?;
        check_status(&response).await
    }

    pub async fn logout(&self) -> Result<(), String> {
        let response = Request::get(&format!("{}/api/method/logout", self.base_url))
            .send()
            .await
            .map_err(|e| format!("request error: {e}"))?;
        check_status(&response).await
    }
}

async fn send<R>(request: RequestBuilder) -> Result<R, String>
where
    R: DeserializeOwned,
{
    decode(request.send().await).await
}

async fn decode<R>(response: Result<Response, gloo::net::Error>) -> Result<R, String>
where
    R: DeserializeOwned,
{
    let response = response.map_err(|e| format!("request error: {e}"))?;
    check_status(&response).await?;
    response
        .json::<R>()
        .await
        .map_err(|e| format!("decode error: {e}"))
}

async fn check_status(response: &Response) -> Result<(), String> {
    if response.ok() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(format!(
        "{} {}: {}",
        response.status(),
        response.status_text(),
        body.chars().take(200).collect::<String>()
    ))
}
