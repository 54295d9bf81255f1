//! Registration, login and current-user checks for the run's test user.

use crate::case::{Position, Suite, TestCase};
use crate::check::Check;
use crate::fixtures::FixtureKey;
use serde_json::json;

pub(super) fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(Suite::Auth, Position::new(1), "register").body(|ctx| {
            let user = ctx.identity().test_user().clone();

            let res = ctx.api().post("/auth/register").json(&user).send()?;
            ctx.verify("Register - 1: Success (201)", &res, Check::status(201).success())?;

            let res = ctx.api().post("/auth/register").json(&user).send()?;
            ctx.verify(
                "Register - 2: Duplicate User (400)",
                &res,
                Check::status(400).error_code("USER_EXISTS"),
            )?;

            let mut missing = user.without_password();
            missing.email = ctx.identity().email("new-email");
            let res = ctx.api().post("/auth/register").json(&missing).send()?;
            ctx.verify(
                "Register - 3: Missing Password (400)",
                &res,
                Check::status(400).error_code("VALIDATION_ERROR"),
            )
        }),
        TestCase::new(Suite::Auth, Position::new(2), "login")
            .writes(&[FixtureKey::UserToken])
            .body(|ctx| {
                let user = ctx.identity().test_user();
                let credentials = user.credentials();
                let wrong = json!({ "email": user.email, "password": "wrongpassword" });

                let res = ctx.api().post("/auth/login").json(&credentials).send()?;
                ctx.verify(
                    "Login - 1: Success (200)",
                    &res,
                    Check::status(200).success().present("/data/token"),
                )?;
                ctx.set(FixtureKey::UserToken, res.text_at("/data/token")?)?;

                let res = ctx.api().post("/auth/login").json(&wrong).send()?;
                ctx.verify(
                    "Login - 2: Wrong Password (401)",
                    &res,
                    Check::status(401).error_code("INVALID_CREDENTIALS"),
                )?;

                let unknown = json!({ "email": "nouser@example.com", "password": ctx.identity().password() });
                let res = ctx.api().post("/auth/login").json(&unknown).send()?;
                ctx.verify(
                    "Login - 3: Non-existent User (401)",
                    &res,
                    Check::status(401).error_code("INVALID_CREDENTIALS"),
                )
            }),
        TestCase::new(Suite::Auth, Position::new(3), "current user")
            .reads(&[FixtureKey::UserToken])
            .body(|ctx| {
                let token = ctx.text(FixtureKey::UserToken)?;
                let email = ctx.identity().test_user().email.clone();

                let res = ctx.api().get("/auth/me").bearer(&token).send()?;
                ctx.verify(
                    "Get Me - 1: Success (200)",
                    &res,
                    Check::status(200).equals("/data/email", email),
                )?;

                let res = ctx.api().get("/auth/me").authorization("Bearer 12345abcdef").send()?;
                ctx.verify(
                    "Get Me - 2: Invalid Token (401)",
                    &res,
                    Check::status(401).error_code("TOKEN_INVALID"),
                )?;

                let res = ctx.api().get("/auth/me").send()?;
                ctx.verify(
                    "Get Me - 3: No Token (401)",
                    &res,
                    Check::status(401).error_code("TOKEN_MISSING"),
                )
            }),
    ]
}
