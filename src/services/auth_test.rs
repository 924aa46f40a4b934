use super::*;

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_lowercases_and_trims() {
    assert_eq!(normalize_email("  User@Example.COM  ").as_deref(), Some("user@example.com"));
}

#[test]
fn normalize_rejects_empty() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("   "), None);
}

#[test]
fn normalize_rejects_missing_at() {
    assert_eq!(normalize_email("userexample.com"), None);
}

#[test]
fn normalize_rejects_empty_local_or_domain() {
    assert_eq!(normalize_email("@example.com"), None);
    assert_eq!(normalize_email("user@"), None);
}

#[test]
fn normalize_rejects_double_at() {
    assert_eq!(normalize_email("a@b@c"), None);
}

// =============================================================================
// name_or_email_local
// =============================================================================

#[test]
fn explicit_name_wins() {
    assert_eq!(name_or_email_local("  Ada  ", "ada@example.com"), "Ada");
}

#[test]
fn blank_name_falls_back_to_email_local_part() {
    assert_eq!(name_or_email_local("", "ada@example.com"), "ada");
    assert_eq!(name_or_email_local("   ", "ada@example.com"), "ada");
}

// =============================================================================
// live-db account flows
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    async fn live_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
        PgPoolOptions::new().connect(&url).await.expect("connect failed")
    }

    fn unique_email() -> String {
        format!("{}@test.local", Uuid::new_v4())
    }

    #[tokio::test]
    async fn signup_then_login() {
        let pool = live_pool().await;
        let email = unique_email();

        let created = signup(&pool, "Ada", &email, "password123").await.unwrap();
        assert_eq!(created.name, "Ada");
        assert_eq!(created.email, email);

        let user = verify_credentials(&pool, &email, "password123").await.unwrap();
        assert_eq!(user.id, created.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = live_pool().await;
        let email = unique_email();

        signup(&pool, "First", &email, "password123").await.unwrap();
        assert!(matches!(
            signup(&pool, "Second", &email, "password456").await,
            Err(AuthError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_alike() {
        let pool = live_pool().await;
        let email = unique_email();
        signup(&pool, "Ada", &email, "password123").await.unwrap();

        assert!(matches!(
            verify_credentials(&pool, &email, "wrong-password").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            verify_credentials(&pool, &unique_email(), "password123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn profile_update_changes_name_and_password() {
        let pool = live_pool().await;
        let email = unique_email();
        let created = signup(&pool, "Ada", &email, "oldpassword").await.unwrap();

        let updated = update_profile(&pool, created.id, Some("Ada L."), None, Some("newpassword")).await.unwrap();
        assert_eq!(updated.name, "Ada L.");
        assert_eq!(updated.email, email);

        assert!(verify_credentials(&pool, &email, "newpassword").await.is_ok());
        assert!(matches!(
            verify_credentials(&pool, &email, "oldpassword").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
