use crate::models::{Health, LoginResponse, Message, Recipe, RecipeMessage};
use anyhow::{anyhow, bail, Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

/// Connection details carried into every request.
#[derive(Debug, Clone)]
pub struct Session {
    base_url: String,
    token: Option<String>,
    http: Client,
}

/// Fields for creating or editing a recipe. `None` leaves a field out of the form.
#[derive(Debug, Default, Clone)]
pub struct RecipeFields {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub cooking_time: Option<u32>,
    pub ingredients: Option<Vec<crate::models::Ingredient>>,
    pub method_steps: Option<Vec<String>>,
    pub nutritional_info: Option<String>,
    pub youtube_link: Option<String>,
    pub image: Option<PathBuf>,
    pub remove_image: bool,
}

impl Session {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .context("this command needs a token: pass --token or set RECIPEHUB_TOKEN")?;
        Ok(builder.bearer_auth(token))
    }

    pub async fn health(&self) -> Result<Health> {
        let response = self.http.get(self.url("/health")).send().await?;
        parse(response).await
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Message> {
        let response = self
            .http
            .post(self.url("/register"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .http
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Recipe>> {
        let mut builder = self.http.get(self.url("/recipes"));
        if let Some(search) = search {
            builder = builder.query(&[("search", search)]);
        }
        let response = self.authed(builder)?.send().await?;
        parse(response).await
    }

    pub async fn show(&self, id: i64) -> Result<Recipe> {
        let builder = self.http.get(self.url(&format!("/recipes/{id}")));
        let response = self.authed(builder)?.send().await?;
        parse(response).await
    }

    pub async fn add(&self, fields: &RecipeFields) -> Result<Recipe> {
        let form = recipe_form(fields).await?;
        let builder = self.http.post(self.url("/recipes")).multipart(form);
        let response = self.authed(builder)?.send().await?;
        parse(response).await
    }

    pub async fn edit(&self, id: i64, fields: &RecipeFields) -> Result<Recipe> {
        let form = recipe_form(fields).await?;
        let builder = self
            .http
            .put(self.url(&format!("/recipes/{id}")))
            .multipart(form);
        let response = self.authed(builder)?.send().await?;
        parse(response).await
    }

    pub async fn delete(&self, id: i64) -> Result<Message> {
        let builder = self.http.delete(self.url(&format!("/recipes/{id}")));
        let response = self.authed(builder)?.send().await?;
        parse(response).await
    }

    pub async fn comment(&self, id: i64, text: &str, rating: u8) -> Result<RecipeMessage> {
        let builder = self
            .http
            .post(self.url(&format!("/recipes/{id}/comment")))
            .json(&json!({ "comment": text, "rating": rating }));
        let response = self.authed(builder)?.send().await?;
        parse(response).await
    }

    pub async fn delete_comment(&self, id: i64, index: usize) -> Result<RecipeMessage> {
        let builder = self
            .http
            .delete(self.url(&format!("/recipes/{id}/comments/{index}")));
        let response = self.authed(builder)?.send().await?;
        parse(response).await
    }
}

async fn recipe_form(fields: &RecipeFields) -> Result<Form> {
    let mut form = Form::new();

    let text_fields = [
        ("name", fields.name.clone()),
        ("cuisine", fields.cuisine.clone()),
        ("cookingTime", fields.cooking_time.map(|t| t.to_string())),
        ("nutritionalInfo", fields.nutritional_info.clone()),
        ("youtubeLink", fields.youtube_link.clone()),
    ];
    for (name, value) in text_fields {
        if let Some(value) = value {
            form = form.text(name, value);
        }
    }

    if let Some(ingredients) = &fields.ingredients {
        let encoded: Vec<_> = ingredients
            .iter()
            .map(|i| json!({ "name": i.name, "quantity": i.quantity, "unit": i.unit }))
            .collect();
        form = form.text("ingredients", serde_json::to_string(&encoded)?);
    }
    if let Some(steps) = &fields.method_steps {
        form = form.text("methodSteps", serde_json::to_string(steps)?);
    }
    if fields.remove_image {
        form = form.text("removeImage", "true");
    }

    if let Some(path) = &fields.image {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        form = form.part("image", Part::bytes(data).file_name(file_name));
    }

    Ok(form)
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// What to show the user for a failed response: the server's own message when
/// it sent one, otherwise a generic line with the status.
pub fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.message.trim().is_empty() => parsed.message,
        _ => format!("Request failed ({status})"),
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        bail!(error_message(status, &body));
    }
    serde_json::from_str(&body).map_err(|e| anyhow!("unexpected response from server: {e}"))
}
