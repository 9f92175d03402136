//! Registration, verification, credentials and account administration.

use chrono::{Duration, Utc};
use freshfarm::accounts::{hash_token, AccountStatus, ProfilePatch, Registration, Role, User};
use freshfarm::{MarketError, ModelsExt};

use crate::support::{admin, customer, shop, subjects, Outbox};

/// Pull the token off the end of the last mailed link.
fn last_link_token(outbox: &Outbox) -> String {
    let sent = outbox.lock().unwrap();
    let body = &sent.last().unwrap().plain_text_body;
    let link = body
        .split_whitespace()
        .find(|word| word.contains("/#/"))
        .unwrap();
    link.rsplit('/').next().unwrap().to_string()
}

#[test]
fn registration_mails_a_verification_link() {
    let (app, outbox) = shop();
    let user = customer(&app, "Chidi@Example.NG ");

    assert_eq!(user.email, "chidi@example.ng");
    assert_eq!(user.role, Role::Customer);
    assert!(!user.is_verified);
    assert_ne!(user.password_hash, "secret-pass");
    assert!(subjects(&outbox).contains(&"Verify your FreshFarm Account".to_string()));

    let token = last_link_token(&outbox);
    assert_eq!(user.verification_token.as_deref(), Some(token.as_str()));

    let verified = app.accounts().verify_email(&token).unwrap();
    assert!(verified.is_verified);
    assert!(verified.verification_token.is_none());

    // Tokens are single use.
    assert!(matches!(
        app.accounts().verify_email(&token),
        Err(MarketError::Validation(_))
    ));
}

#[test]
fn duplicate_email_is_a_conflict() {
    let (app, _) = shop();
    customer(&app, "chidi@example.ng");
    let err = app
        .accounts()
        .register(Registration {
            name: "Someone Else".into(),
            email: "CHIDI@example.ng".into(),
            password: "another-pass".into(),
        })
        .unwrap_err();
    assert!(matches!(err, MarketError::Conflict(_)));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn short_passwords_are_refused() {
    let (app, _) = shop();
    let err = app
        .accounts()
        .register(Registration {
            name: "Chidi".into(),
            email: "chidi@example.ng".into(),
            password: "12345".into(),
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Password must be at least 6 characters");
}

#[test]
fn login_checks_password_and_block_status() {
    let (app, _) = shop();
    let boss = admin(&app);
    let user = customer(&app, "chidi@example.ng");

    assert_eq!(
        app.accounts()
            .authenticate("chidi@example.ng", "secret-pass")
            .unwrap()
            .id,
        user.id
    );
    assert!(matches!(
        app.accounts().authenticate("chidi@example.ng", "wrong"),
        Err(MarketError::InvalidCredentials)
    ));
    assert!(matches!(
        app.accounts().authenticate("nobody@example.ng", "secret-pass"),
        Err(MarketError::InvalidCredentials)
    ));

    app.accounts()
        .set_status(&boss, &user.id, AccountStatus::Blocked)
        .unwrap();
    let err = app
        .accounts()
        .authenticate("chidi@example.ng", "secret-pass")
        .unwrap_err();
    assert!(matches!(err, MarketError::AccountSuspended));
    assert_eq!(err.status_code(), 403);

    app.accounts()
        .set_status(&boss, &user.id, AccountStatus::Active)
        .unwrap();
    assert!(app
        .accounts()
        .authenticate("chidi@example.ng", "secret-pass")
        .is_ok());
}

#[test]
fn password_reset_round() {
    let (app, outbox) = shop();
    let user = customer(&app, "chidi@example.ng");

    app.accounts().forgot_password("chidi@example.ng").unwrap();
    assert!(subjects(&outbox).contains(&"Password Reset Request - Farmers Market".to_string()));
    let token = last_link_token(&outbox);

    let stored = app.accounts().get(&user.id).unwrap();
    assert_eq!(stored.reset_password_token, Some(hash_token(&token)));

    app.accounts().reset_password(&token, "brand-new-pass").unwrap();
    assert!(app
        .accounts()
        .authenticate("chidi@example.ng", "brand-new-pass")
        .is_ok());
    assert!(app
        .accounts()
        .authenticate("chidi@example.ng", "secret-pass")
        .is_err());

    // Spent.
    assert!(app.accounts().reset_password(&token, "third-pass").is_err());
}

#[test]
fn expired_reset_token_is_refused() {
    let (app, outbox) = shop();
    let user = customer(&app, "chidi@example.ng");
    app.accounts().forgot_password("chidi@example.ng").unwrap();
    let token = last_link_token(&outbox);

    app.store()
        .models::<User>()
        .modify(&user.id, |u| {
            u.reset_password_expire = Some(Utc::now() - Duration::minutes(1));
            Ok::<_, MarketError>(())
        })
        .unwrap();

    let err = app
        .accounts()
        .reset_password(&token, "brand-new-pass")
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired token");
    assert!(app
        .accounts()
        .authenticate("chidi@example.ng", "secret-pass")
        .is_ok());
}

#[test]
fn forgot_password_for_unknown_email() {
    let (app, _) = shop();
    assert!(matches!(
        app.accounts().forgot_password("ghost@example.ng"),
        Err(MarketError::NotFound { .. })
    ));
}

#[test]
fn profile_updates_are_owner_or_admin_only() {
    let (app, _) = shop();
    let boss = admin(&app);
    let user = customer(&app, "chidi@example.ng");
    let other = customer(&app, "ngozi@example.ng");

    assert!(matches!(
        app.accounts().update_profile(
            &other,
            &user.id,
            ProfilePatch {
                name: Some("Hijacked".into()),
                ..Default::default()
            }
        ),
        Err(MarketError::NotAuthorized(_))
    ));

    let taken = app.accounts().update_profile(
        &user,
        &user.id,
        ProfilePatch {
            email: Some("ngozi@example.ng".into()),
            ..Default::default()
        },
    );
    assert!(matches!(taken, Err(MarketError::Conflict(_))));

    // A customer cannot unblock or block themselves through the profile.
    let same = app
        .accounts()
        .update_profile(
            &user,
            &user.id,
            ProfilePatch {
                name: Some("Chidi O.".into()),
                status: Some(AccountStatus::Blocked),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(same.name, "Chidi O.");
    assert_eq!(same.status, AccountStatus::Active);

    let blocked = app
        .accounts()
        .update_profile(
            &boss,
            &user.id,
            ProfilePatch {
                status: Some(AccountStatus::Blocked),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(blocked.is_blocked());
}

#[test]
fn admin_only_listing() {
    let (app, _) = shop();
    let boss = admin(&app);
    let user = customer(&app, "chidi@example.ng");

    assert!(matches!(
        app.accounts().list(&user),
        Err(MarketError::NotAuthorized(_))
    ));
    assert_eq!(app.accounts().list(&boss).unwrap().len(), 2);
}

#[test]
fn session_tokens_name_their_user() {
    let (app, _) = shop();
    let user = customer(&app, "chidi@example.ng");
    let token = app.accounts().session_token(&user).unwrap();
    assert_eq!(app.accounts().session_user(&token), Some(user.id.clone()));

    // Each storefront signs with its own key.
    let (elsewhere, _) = shop();
    assert_eq!(elsewhere.accounts().session_user(&token), None);
}

#[test]
fn bootstrap_promotes_an_existing_account() {
    let (app, _) = shop();
    let user = customer(&app, "chidi@example.ng");
    let promoted = app
        .accounts()
        .bootstrap_admin("Chidi", "chidi@example.ng", "ignored-pass")
        .unwrap();
    assert_eq!(promoted.id, user.id);
    assert!(promoted.is_admin());
}
