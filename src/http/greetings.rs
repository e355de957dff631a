//! Greeting endpoint.

use axum::extract::Path;

/// `GET /greetings/{name}`: plain-text greeting.
pub async fn greeting(Path(name): Path<String>) -> String {
    tracing::debug!(name = %name, "Greeting requested");
    format!("Hello, {name}!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn greets_by_name() {
        assert_eq!(greeting(Path("John".to_string())).await, "Hello, John!");
    }
}
