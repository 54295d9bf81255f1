//! Category CRUD as the owner, plus the single owner-login exchange the
//! later suites depend on.

use super::{register_and_login, NONEXISTENT_ID};
use crate::case::{Position, Suite, TestCase};
use crate::check::Check;
use crate::fixtures::{FixtureKey, UserPayload};
use serde_json::json;

pub(super) fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(Suite::Categories, Position::new(4), "owner login")
            .setup()
            .writes(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let credentials = ctx.config().seed.owner_credentials();
                let res = ctx.api().post("/auth/login").json(&credentials).send()?;
                ctx.verify(
                    "Category - 0: Get Owner Token",
                    &res,
                    Check::status(200).present("/data/token"),
                )?;
                ctx.set(FixtureKey::OwnerToken, res.text_at("/data/token")?)
            }),
        TestCase::new(Suite::Categories, Position::new(5), "list public").body(|ctx| {
            let res = ctx.api().get("/categories").send()?;
            ctx.verify(
                "GET - 1: Get All (Public)",
                &res,
                Check::status(200).present("/count"),
            )
        }),
        TestCase::new(Suite::Categories, Position::new(6), "create without token").body(|ctx| {
            let res = ctx
                .api()
                .post("/categories")
                .json(&json!({ "name": "No Token Test" }))
                .send()?;
            ctx.verify(
                "Security - 1: POST without token (401)",
                &res,
                Check::status(401).error_code("TOKEN_MISSING"),
            )
        }),
        TestCase::new(Suite::Categories, Position::new(7), "create as customer").body(|ctx| {
            let user = UserPayload::new(
                ctx.identity().email("customer"),
                ctx.identity().password(),
                "Temp",
                "Customer",
            );
            let token = register_and_login(ctx, "Security - 2: temporary customer", &user)?;

            let res = ctx
                .api()
                .post("/categories")
                .bearer(&token)
                .json(&json!({ "name": "Customer Test" }))
                .send()?;
            ctx.verify(
                "Security - 2: POST with Customer token (403)",
                &res,
                Check::status(403).error_code("FORBIDDEN"),
            )
        }),
        TestCase::new(Suite::Categories, Position::new(8), "create validation")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = ctx.text(FixtureKey::OwnerToken)?;

                let res = ctx
                    .api()
                    .post("/categories")
                    .bearer(&token)
                    .json(&json!({ "name": "" }))
                    .send()?;
                ctx.verify(
                    "POST - 1: Validation (Missing Name)",
                    &res,
                    Check::status(400).message_contains("name is required"),
                )?;

                let res = ctx
                    .api()
                    .post("/categories")
                    .bearer(&token)
                    .json(&json!({ "name": "a".repeat(51) }))
                    .send()?;
                ctx.verify(
                    "POST - 2: Validation (Long Name)",
                    &res,
                    Check::status(400).message_contains("more than 50"),
                )
            }),
        TestCase::new(Suite::Categories, Position::new(9), "create")
            .reads(&[FixtureKey::OwnerToken])
            .writes(&[FixtureKey::CategoryId, FixtureKey::CategorySlug])
            .body(|ctx| {
                let token = ctx.text(FixtureKey::OwnerToken)?;
                let name = ctx.identity().name("Test Electronics");
                let category = json!({ "name": name, "description": "A test category" });

                let res = ctx.api().post("/categories").bearer(&token).json(&category).send()?;
                ctx.verify(
                    "POST - 3: Happy Path (Create)",
                    &res,
                    Check::status(201).equals("/data/name", name.as_str()),
                )?;
                ctx.set(FixtureKey::CategoryId, res.text_at("/data/_id")?)?;
                ctx.set(FixtureKey::CategorySlug, res.text_at("/data/slug")?)?;

                let res = ctx.api().post("/categories").bearer(&token).json(&category).send()?;
                ctx.verify(
                    "POST - 4: Logic (Duplicate Name)",
                    &res,
                    Check::status(400).message_contains("already exists"),
                )
            }),
        TestCase::new(Suite::Categories, Position::new(10), "get by slug")
            .reads(&[FixtureKey::CategorySlug])
            .body(|ctx| {
                let slug = ctx.text(FixtureKey::CategorySlug)?;

                let res = ctx.api().get(&format!("/categories/{slug}")).send()?;
                ctx.verify(
                    "GET - 2: Get Single (Happy Path)",
                    &res,
                    Check::status(200).equals("/data/slug", slug.as_str()),
                )?;

                let res = ctx.api().get("/categories/does-not-exist").send()?;
                ctx.verify(
                    "GET - 3: Get Single (Not Found)",
                    &res,
                    Check::status(404).error_code("NOT_FOUND"),
                )
            }),
        TestCase::new(Suite::Categories, Position::new(11), "update")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::CategoryId])
            .body(|ctx| {
                let token = ctx.text(FixtureKey::OwnerToken)?;
                let id = ctx.text(FixtureKey::CategoryId)?;
                let name = ctx.identity().name("Test Gadgets");
                let update = json!({ "name": name, "description": "Updated desc" });

                let res = ctx
                    .api()
                    .put(&format!("/categories/{id}"))
                    .bearer(&token)
                    .json(&update)
                    .send()?;
                ctx.verify(
                    "PUT - 1: Happy Path (Update)",
                    &res,
                    Check::status(200).equals("/data/name", name.as_str()),
                )?;

                let res = ctx
                    .api()
                    .put(&format!("/categories/{NONEXISTENT_ID}"))
                    .bearer(&token)
                    .json(&update)
                    .send()?;
                ctx.verify(
                    "PUT - 2: Logic (Not Found)",
                    &res,
                    Check::status(404).error_code("NOT_FOUND"),
                )
            }),
        TestCase::new(Suite::Categories, Position::new(12), "delete")
            .cleanup()
            .reads(&[FixtureKey::OwnerToken, FixtureKey::CategoryId])
            .body(|ctx| {
                let token = ctx.text(FixtureKey::OwnerToken)?;
                let path = format!("/categories/{}", ctx.text(FixtureKey::CategoryId)?);

                let res = ctx.api().delete(&path).bearer(&token).send()?;
                ctx.verify("DELETE - 1: Happy Path", &res, Check::status(200).success())?;

                let res = ctx.api().delete(&path).bearer(&token).send()?;
                ctx.verify(
                    "DELETE - 2: Logic (Not Found)",
                    &res,
                    Check::status(404).error_code("NOT_FOUND"),
                )
            }),
    ]
}
