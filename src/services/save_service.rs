use serde_json::Value;
use tracing::info;

use crate::{error::ServiceError, state::SharedState};

const NO_SAVE_DATA: &str = "No save data found";

/// Store `blob` as the latest save for `user_id`, replacing any previous one.
pub async fn save_player(
    state: &SharedState,
    user_id: String,
    blob: Value,
) -> Result<(), ServiceError> {
    state.saves().put(user_id.clone(), blob).await?;
    info!(user_id = %user_id, "player save stored");
    Ok(())
}

/// Return the latest save for `user_id`.
///
/// A falsy blob (`null`, `false`, `0` or `""`) counts as no save at all.
pub async fn load_player(state: &SharedState, user_id: String) -> Result<Value, ServiceError> {
    match state.saves().get(user_id.clone()).await? {
        Some(blob) if !is_falsy(&blob) => {
            info!(user_id = %user_id, "player save loaded");
            Ok(blob)
        }
        _ => {
            info!(user_id = %user_id, "no save data for player");
            Err(ServiceError::NotFound(NO_SAVE_DATA.into()))
        }
    }
}

fn is_falsy(blob: &Value) -> bool {
    match blob {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};
    use serde_json::json;

    #[tokio::test]
    async fn load_returns_last_saved_blob() {
        let state = AppState::new(AppConfig::default());
        save_player(&state, "A".into(), json!({ "level": 1 }))
            .await
            .unwrap();
        save_player(&state, "A".into(), json!({ "level": 2 }))
            .await
            .unwrap();

        assert_eq!(
            load_player(&state, "A".into()).await.unwrap(),
            json!({ "level": 2 })
        );
    }

    #[tokio::test]
    async fn load_of_unknown_or_null_save_is_not_found() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(
            load_player(&state, "missing".into()).await,
            Err(ServiceError::NotFound(_))
        ));

        save_player(&state, "B".into(), Value::Null).await.unwrap();
        assert!(matches!(
            load_player(&state, "B".into()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn falsy_saves_load_as_not_found() {
        let state = AppState::new(AppConfig::default());
        for (user_id, blob) in [
            ("zero", json!(0)),
            ("zero-float", json!(0.0)),
            ("false", json!(false)),
            ("empty", json!("")),
        ] {
            save_player(&state, user_id.into(), blob).await.unwrap();
            assert!(
                matches!(
                    load_player(&state, user_id.into()).await,
                    Err(ServiceError::NotFound(_))
                ),
                "{user_id} should load as missing"
            );
        }
    }

    #[tokio::test]
    async fn truthy_scalars_and_empty_containers_load() {
        let state = AppState::new(AppConfig::default());
        for blob in [json!(1), json!(true), json!("0"), json!([]), json!({})] {
            save_player(&state, "A".into(), blob.clone()).await.unwrap();
            assert_eq!(load_player(&state, "A".into()).await.unwrap(), blob);
        }
    }
}
