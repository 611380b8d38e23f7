//! Account endpoints

use serde_json::Value;
use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::session::Session;
use crate::types::{LoginRequest, LoginResult, ProfileUpdate, RegisterRequest, User};

/// `POST /users/login`; on success the returned token and user become the session.
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<LoginResult> {
    let result: LoginResult = client.post("/users/login", request).await?;
    client
        .session()
        .set(Session::new(result.access_token.clone(), result.user.clone()))
        .await?;
    info!(account = %request.account, "Signed in");
    Ok(result)
}

/// `POST /users/register`
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<Value> {
    client.post("/users/register", request).await
}

/// `GET /users/info`
pub async fn current_user(client: &ApiClient) -> Result<User> {
    client.get("/users/info").await
}

/// `PUT /users/info`; refreshes the stored user when signed in.
pub async fn update_profile(client: &ApiClient, update: &ProfileUpdate) -> Result<Value> {
    let data: Value = client.put("/users/info", update).await?;
    if data.is_object() {
        client.session().set_user(data.clone()).await?;
    }
    Ok(data)
}

/// Forget the session locally. The server keeps no logout state.
pub async fn logout(client: &ApiClient) -> Result<()> {
    client.session().clear().await?;
    info!("Signed out");
    Ok(())
}
