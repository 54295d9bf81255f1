//! Product CRUD: role checks, field validation, SKU uniqueness and
//! newest-first listing.

use super::{create_category, create_product, delete_ok, product_body, register_and_login, NONEXISTENT_ID};
use crate::case::{CaseContext, Position, Suite, TestCase};
use crate::check::Check;
use crate::client::ApiRequest;
use crate::error::Result;
use crate::fixtures::{FixtureKey, UserPayload};
use serde_json::json;

const SECURITY: Position = Position::new(15);
const VALIDATION: Position = Position::new(16);
const READS: Position = Position::new(20);
const CLEANUP: Position = Position::new(26);

const LAPTOP: &str = "SuperGamer Laptop";

/// A write route hit by the security cases, without credentials.
fn write_route(ctx: &CaseContext<'_>, method: &str) -> ApiRequest {
    let api = ctx.api();
    let request = match method {
        "PUT" => api.put("/products/fake-id"),
        "DELETE" => api.delete("/products/fake-id"),
        _ => api.post("/products"),
    };
    request.json(&json!({}))
}

fn security_cases() -> Vec<TestCase> {
    let mut cases = Vec::new();
    for method in ["POST", "PUT", "DELETE"] {
        cases.push(
            TestCase::new(Suite::Products, SECURITY, &format!("{method} without token")).body(
                move |ctx| {
                    let res = write_route(ctx, method).send()?;
                    ctx.verify(
                        &format!("Security: {method} without token (401)"),
                        &res,
                        Check::status(401).error_code("TOKEN_MISSING"),
                    )
                },
            ),
        );
        cases.push(
            TestCase::new(Suite::Products, SECURITY, &format!("{method} as customer"))
                .reads(&[FixtureKey::ProductCustomerToken])
                .body(move |ctx| {
                    let token = ctx.text(FixtureKey::ProductCustomerToken)?;
                    let res = write_route(ctx, method).bearer(&token).send()?;
                    ctx.verify(
                        &format!("Security: {method} with Customer token (403)"),
                        &res,
                        Check::status(403).error_code("FORBIDDEN"),
                    )
                }),
        );
    }
    cases
}

fn owner(ctx: &CaseContext<'_>) -> Result<String> {
    ctx.text(FixtureKey::OwnerToken)
}

pub(super) fn cases() -> Vec<TestCase> {
    let mut cases = vec![
        TestCase::new(Suite::Products, Position::new(13), "owner token present")
            .setup()
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                ctx.note("Product tests are using the Owner token.");
                Ok(())
            }),
        TestCase::new(Suite::Products, Position::new(14), "temporary customer")
            .setup()
            .writes(&[FixtureKey::ProductCustomerToken])
            .body(|ctx| {
                let user = UserPayload::new(
                    ctx.identity().email("customer-product-test"),
                    ctx.identity().password(),
                    "Product",
                    "Tester",
                );
                let token = register_and_login(ctx, "Setup: product customer", &user)?;
                ctx.set(FixtureKey::ProductCustomerToken, token)?;
                ctx.note("Product tests created a temporary customer.");
                Ok(())
            }),
        TestCase::new(Suite::Products, Position::at(14, 500), "product category")
            .setup()
            .reads(&[FixtureKey::OwnerToken])
            .writes(&[FixtureKey::ProductCategoryId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let name = ctx.identity().name("Test Product Category");
                let id = create_category(ctx, "Setup: product category (201)", &token, &name)?;
                ctx.set(FixtureKey::ProductCategoryId, id)?;
                ctx.note(&format!("Product tests created category: {name}"));
                Ok(())
            }),
    ];

    cases.extend(security_cases());

    cases.extend([
        TestCase::new(Suite::Products, VALIDATION, "create missing fields")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let res = ctx.api().post("/products").bearer(&token).json(&json!({})).send()?;
                ctx.verify(
                    "Validation: create with missing fields (400)",
                    &res,
                    Check::status(400)
                        .message_contains("Product name is required")
                        .message_contains("Price is required"),
                )
            }),
        TestCase::new(Suite::Products, VALIDATION, "create bad data")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let body = json!({
                    "name": "Test",
                    "description": "Test",
                    "price": -10,
                    "sku": "BAD",
                    "stock": "fifty",
                    "categoryId": "123",
                });
                let res = ctx.api().post("/products").bearer(&token).json(&body).send()?;
                ctx.verify(
                    "Validation: create with bad data (400)",
                    &res,
                    Check::status(400)
                        .message_contains("Price must be a positive number")
                        .message_contains("Stock must be a positive integer")
                        .message_contains("Invalid Category ID format"),
                )
            }),
        TestCase::new(Suite::Products, VALIDATION, "update bad data")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let body = json!({ "price": -99, "stock": "not-a-number" });
                let res = ctx
                    .api()
                    .put("/products/fake-id")
                    .bearer(&token)
                    .json(&body)
                    .send()?;
                ctx.verify(
                    "Validation: update with bad data (400)",
                    &res,
                    Check::status(400)
                        .message_contains("Price must be a positive number")
                        .message_contains("Stock must be a positive integer"),
                )
            }),
        TestCase::new(Suite::Products, Position::new(17), "unknown category")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let body = product_body("Test", 100.0, "SKU-404", 10, NONEXISTENT_ID);
                let res = ctx.api().post("/products").bearer(&token).json(&body).send()?;
                ctx.verify(
                    "Logic: create with unknown category (404)",
                    &res,
                    Check::status(404).message_equals("Category not found"),
                )
            }),
        TestCase::new(Suite::Products, Position::new(18), "create")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::ProductCategoryId])
            .writes(&[FixtureKey::ProductId, FixtureKey::ProductSlug])
            .body(|ctx| {
                let token = owner(ctx)?;
                let category = ctx.text(FixtureKey::ProductCategoryId)?;
                let name = ctx.identity().name(LAPTOP);
                let body = product_body(&name, 1499.99, &ctx.identity().sku("SG-LAP"), 50, &category);

                let res = create_product(ctx, "Create: Happy Path (201)", &token, &body)?;
                ctx.verify(
                    "Create: name echoed",
                    &res,
                    Check::status(201).equals("/data/name", name.as_str()),
                )?;
                ctx.set(FixtureKey::ProductId, res.text_at("/data/_id")?)?;
                ctx.set(FixtureKey::ProductSlug, res.text_at("/data/slug")?)
            }),
        TestCase::new(Suite::Products, Position::new(19), "duplicate sku")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::ProductCategoryId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let category = ctx.text(FixtureKey::ProductCategoryId)?;
                let name = ctx.identity().name("Another Laptop");
                let body = product_body(&name, 999.0, &ctx.identity().sku("SG-LAP"), 10, &category);

                let res = ctx.api().post("/products").bearer(&token).json(&body).send()?;
                ctx.verify(
                    "Logic: duplicate SKU (400)",
                    &res,
                    Check::status(400).message_contains("SKU already exists"),
                )
            }),
        TestCase::new(Suite::Products, READS, "list public").body(|ctx| {
            let name = ctx.identity().name(LAPTOP);
            let res = ctx.api().get("/products").send()?;
            ctx.verify(
                "GET: list (Public)",
                &res,
                Check::status(200)
                    .at_least("/count", 1.0)
                    .equals("/data/0/name", name),
            )
        }),
        TestCase::new(Suite::Products, READS, "get by slug")
            .reads(&[FixtureKey::ProductSlug])
            .body(|ctx| {
                let slug = ctx.text(FixtureKey::ProductSlug)?;
                let res = ctx.api().get(&format!("/products/{slug}")).send()?;
                ctx.verify(
                    "GET: single by slug (200)",
                    &res,
                    Check::status(200).equals("/data/slug", slug.as_str()),
                )
            }),
        TestCase::new(Suite::Products, READS, "get unknown slug").body(|ctx| {
            let res = ctx.api().get("/products/does-not-exist").send()?;
            ctx.verify(
                "GET: single not found (404)",
                &res,
                Check::status(404).message_equals("Product not found"),
            )
        }),
        TestCase::new(Suite::Products, Position::new(21), "update unknown")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let res = ctx
                    .api()
                    .put(&format!("/products/{NONEXISTENT_ID}"))
                    .bearer(&token)
                    .json(&json!({}))
                    .send()?;
                ctx.verify(
                    "Update: not found (404)",
                    &res,
                    Check::status(404).message_equals("Product not found"),
                )
            }),
        TestCase::new(Suite::Products, Position::new(22), "update to taken sku")
            .reads(&[
                FixtureKey::OwnerToken,
                FixtureKey::ProductCategoryId,
                FixtureKey::ProductId,
            ])
            .writes(&[FixtureKey::SecondProductId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let category = ctx.text(FixtureKey::ProductCategoryId)?;
                let first = ctx.text(FixtureKey::ProductId)?;
                let sku = ctx.identity().sku("SKU-SECOND");
                let body = product_body(&ctx.identity().name("Second Laptop"), 100.0, &sku, 10, &category);

                let res = create_product(ctx, "Update: create second product (201)", &token, &body)?;
                ctx.set(FixtureKey::SecondProductId, res.text_at("/data/_id")?)?;

                let res = ctx
                    .api()
                    .put(&format!("/products/{first}"))
                    .bearer(&token)
                    .json(&json!({ "sku": sku }))
                    .send()?;
                ctx.verify(
                    "Update: duplicate SKU (400)",
                    &res,
                    Check::status(400).message_contains("SKU already exists"),
                )
            }),
        TestCase::new(Suite::Products, Position::new(23), "update")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::ProductId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let id = ctx.text(FixtureKey::ProductId)?;
                let name = ctx.identity().name("SuperGamer Laptop v2");
                let res = ctx
                    .api()
                    .put(&format!("/products/{id}"))
                    .bearer(&token)
                    .json(&json!({ "name": name, "price": 1599.99 }))
                    .send()?;
                ctx.verify(
                    "Update: Happy Path (200)",
                    &res,
                    Check::status(200)
                        .equals("/data/name", name.as_str())
                        .amount("/data/price", 1599.99),
                )
            }),
        TestCase::new(Suite::Products, Position::new(24), "delete")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::ProductId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let path = format!("/products/{}", ctx.text(FixtureKey::ProductId)?);
                delete_ok(ctx, "Delete: Happy Path (200)", &token, &path)
            }),
        TestCase::new(Suite::Products, Position::new(25), "delete again")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::ProductId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let id = ctx.text(FixtureKey::ProductId)?;
                let res = ctx.api().delete(&format!("/products/{id}")).bearer(&token).send()?;
                ctx.verify(
                    "Delete: not found (404)",
                    &res,
                    Check::status(404).message_equals("Product not found"),
                )
            }),
        TestCase::new(Suite::Products, CLEANUP, "delete second product")
            .cleanup()
            .reads(&[FixtureKey::OwnerToken, FixtureKey::SecondProductId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let path = format!("/products/{}", ctx.text(FixtureKey::SecondProductId)?);
                delete_ok(ctx, "Cleanup: second product", &token, &path)
            }),
        TestCase::new(Suite::Products, CLEANUP, "delete product category")
            .cleanup()
            .reads(&[FixtureKey::OwnerToken, FixtureKey::ProductCategoryId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let id = ctx.text(FixtureKey::ProductCategoryId)?;
                delete_ok(ctx, "Cleanup: product category", &token, &format!("/categories/{id}"))?;
                ctx.note(&format!("Product tests cleaned up category: {id}"));
                Ok(())
            }),
    ]);

    cases
}
