//! Cart lifecycle under the owner identity: add, merge, update, remove,
//! clear, with stock limits and subtotal arithmetic.

use super::{create_category, create_product, delete_ok, product_body, NONEXISTENT_ID};
use crate::case::{CaseContext, Position, Suite, TestCase};
use crate::check::Check;
use crate::client::ApiResponse;
use crate::error::Result;
use crate::fixtures::FixtureKey;
use serde_json::{json, Value};

const PRICE: f64 = 10.50;
const STOCK: u64 = 50;

fn owner(ctx: &CaseContext<'_>) -> Result<String> {
    ctx.text(FixtureKey::OwnerToken)
}

fn add_item(ctx: &CaseContext<'_>, token: &str, body: &Value) -> Result<ApiResponse> {
    ctx.api().post("/cart/items").bearer(token).json(body).send()
}

fn update_item(ctx: &CaseContext<'_>, token: &str, item: &str, quantity: u64) -> Result<ApiResponse> {
    ctx.api()
        .put(&format!("/cart/items/{item}"))
        .bearer(token)
        .json(&json!({ "quantity": quantity }))
        .send()
}

/// A single-line cart holding `quantity` units.
fn one_line(price: f64, quantity: u64) -> Check {
    Check::status(200)
        .len("/data/items", 1)
        .equals("/data/items/0/quantity", quantity)
        .amount("/data/subtotal", price * quantity as f64)
}

fn empty_cart() -> Check {
    Check::status(200).len("/data/items", 0).amount("/data/subtotal", 0.0)
}

pub(super) fn cases() -> Vec<TestCase> {
    vec![
        TestCase::new(Suite::Cart, Position::new(27), "setup")
            .setup()
            .reads(&[FixtureKey::OwnerToken])
            .writes(&[
                FixtureKey::CartCategoryId,
                FixtureKey::CartProductId,
                FixtureKey::CartProductStock,
                FixtureKey::CartProductPrice,
            ])
            .body(|ctx| {
                let token = owner(ctx)?;
                let category_name = ctx.identity().name("Cart Test Cat");
                let category = create_category(ctx, "Cart setup: category (201)", &token, &category_name)?;
                ctx.set(FixtureKey::CartCategoryId, category.as_str())?;

                let body = product_body(
                    &ctx.identity().name("Cart Test Product"),
                    PRICE,
                    &ctx.identity().sku("CART-TEST"),
                    STOCK,
                    &category,
                );
                let res = create_product(ctx, "Cart setup: product (201)", &token, &body)?;
                ctx.set(FixtureKey::CartProductId, res.text_at("/data/_id")?)?;
                ctx.set(FixtureKey::CartProductStock, STOCK)?;
                ctx.set(FixtureKey::CartProductPrice, PRICE)
            }),
        TestCase::new(Suite::Cart, Position::new(28), "empty cart")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let res = ctx.api().get("/cart").bearer(&token).send()?;
                ctx.verify("Cart: empty on first read", &res, empty_cart())
            }),
        TestCase::new(Suite::Cart, Position::new(29), "add validation")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;

                let res = add_item(ctx, &token, &json!({ "quantity": 1 }))?;
                ctx.verify(
                    "Add: missing product id (400)",
                    &res,
                    Check::status(400).message_contains("Product ID is required"),
                )?;

                let res = add_item(ctx, &token, &json!({ "productId": "123", "quantity": 0 }))?;
                ctx.verify(
                    "Add: zero quantity (400)",
                    &res,
                    Check::status(400).message_contains("positive integer"),
                )
            }),
        TestCase::new(Suite::Cart, Position::new(29), "add unknown product")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let res = add_item(ctx, &token, &json!({ "productId": NONEXISTENT_ID, "quantity": 1 }))?;
                ctx.verify(
                    "Add: product not found (404)",
                    &res,
                    Check::status(404).message_equals("Product not found"),
                )
            }),
        TestCase::new(Suite::Cart, Position::new(30), "add")
            .reads(&[
                FixtureKey::OwnerToken,
                FixtureKey::CartProductId,
                FixtureKey::CartProductPrice,
            ])
            .writes(&[FixtureKey::CartItemId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let product = ctx.text(FixtureKey::CartProductId)?;
                let price = ctx.amount(FixtureKey::CartProductPrice)?;

                let res = add_item(ctx, &token, &json!({ "productId": product, "quantity": 2 }))?;
                ctx.verify("Add: Happy Path (200)", &res, one_line(price, 2))?;
                ctx.set(FixtureKey::CartItemId, res.text_at("/data/items/0/_id")?)
            }),
        TestCase::new(Suite::Cart, Position::new(31), "add over stock")
            .reads(&[
                FixtureKey::OwnerToken,
                FixtureKey::CartProductId,
                FixtureKey::CartProductStock,
            ])
            .body(|ctx| {
                let token = owner(ctx)?;
                let product = ctx.text(FixtureKey::CartProductId)?;
                let stock = ctx.count(FixtureKey::CartProductStock)?;

                let res = add_item(ctx, &token, &json!({ "productId": product, "quantity": stock + 100 }))?;
                ctx.verify(
                    "Add: insufficient stock (400)",
                    &res,
                    Check::status(400).message_contains("Insufficient stock"),
                )
            }),
        TestCase::new(Suite::Cart, Position::new(32), "add merges")
            .reads(&[
                FixtureKey::OwnerToken,
                FixtureKey::CartProductId,
                FixtureKey::CartProductPrice,
            ])
            .body(|ctx| {
                let token = owner(ctx)?;
                let product = ctx.text(FixtureKey::CartProductId)?;
                let price = ctx.amount(FixtureKey::CartProductPrice)?;

                let res = add_item(ctx, &token, &json!({ "productId": product, "quantity": 3 }))?;
                ctx.verify("Add: same product merges lines (200)", &res, one_line(price, 5))
            }),
        TestCase::new(Suite::Cart, Position::new(33), "update validation")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::CartItemId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let item = ctx.text(FixtureKey::CartItemId)?;
                let res = update_item(ctx, &token, &item, 0)?;
                ctx.verify(
                    "Update: zero quantity (400)",
                    &res,
                    Check::status(400).message_contains("positive integer"),
                )
            }),
        TestCase::new(Suite::Cart, Position::new(33), "update unknown item")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let res = update_item(ctx, &token, NONEXISTENT_ID, 10)?;
                ctx.verify(
                    "Update: item not found (404)",
                    &res,
                    Check::status(404).message_equals("Item not found in cart"),
                )
            }),
        TestCase::new(Suite::Cart, Position::new(34), "update over stock")
            .reads(&[
                FixtureKey::OwnerToken,
                FixtureKey::CartItemId,
                FixtureKey::CartProductStock,
            ])
            .body(|ctx| {
                let token = owner(ctx)?;
                let item = ctx.text(FixtureKey::CartItemId)?;
                let stock = ctx.count(FixtureKey::CartProductStock)?;
                let res = update_item(ctx, &token, &item, stock + 100)?;
                ctx.verify(
                    "Update: insufficient stock (400)",
                    &res,
                    Check::status(400).message_contains("Insufficient stock"),
                )
            }),
        TestCase::new(Suite::Cart, Position::new(35), "update")
            .reads(&[
                FixtureKey::OwnerToken,
                FixtureKey::CartItemId,
                FixtureKey::CartProductPrice,
            ])
            .body(|ctx| {
                let token = owner(ctx)?;
                let item = ctx.text(FixtureKey::CartItemId)?;
                let price = ctx.amount(FixtureKey::CartProductPrice)?;
                let res = update_item(ctx, &token, &item, 10)?;
                ctx.verify("Update: Happy Path (200)", &res, one_line(price, 10))
            }),
        TestCase::new(Suite::Cart, Position::new(36), "remove unknown item")
            .reads(&[FixtureKey::OwnerToken])
            .body(|ctx| {
                let token = owner(ctx)?;
                let res = ctx
                    .api()
                    .delete(&format!("/cart/items/{NONEXISTENT_ID}"))
                    .bearer(&token)
                    .send()?;
                ctx.verify(
                    "Remove: item not found (404)",
                    &res,
                    Check::status(404).message_equals("Item not found in cart"),
                )
            }),
        TestCase::new(Suite::Cart, Position::new(37), "remove")
            .reads(&[FixtureKey::OwnerToken, FixtureKey::CartItemId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let item = ctx.text(FixtureKey::CartItemId)?;
                let res = ctx
                    .api()
                    .delete(&format!("/cart/items/{item}"))
                    .bearer(&token)
                    .send()?;
                ctx.verify("Remove: Happy Path (200)", &res, empty_cart())
            }),
        TestCase::new(Suite::Cart, Position::new(38), "clear")
            .reads(&[
                FixtureKey::OwnerToken,
                FixtureKey::CartProductId,
                FixtureKey::CartProductPrice,
            ])
            .body(|ctx| {
                let token = owner(ctx)?;
                let product = ctx.text(FixtureKey::CartProductId)?;
                let price = ctx.amount(FixtureKey::CartProductPrice)?;

                let res = add_item(ctx, &token, &json!({ "productId": product, "quantity": 1 }))?;
                ctx.verify("Clear: add one item back (200)", &res, one_line(price, 1))?;

                let res = ctx.api().delete("/cart").bearer(&token).send()?;
                ctx.verify("Clear: Happy Path (200)", &res, empty_cart())
            }),
        TestCase::new(Suite::Cart, Position::new(39), "no token").body(|ctx| {
            let res = ctx.api().get("/cart").send()?;
            ctx.verify(
                "Security: GET without token (401)",
                &res,
                Check::status(401).error_code("TOKEN_MISSING"),
            )
        }),
        TestCase::new(Suite::Cart, Position::new(40), "delete product")
            .cleanup()
            .reads(&[FixtureKey::OwnerToken, FixtureKey::CartProductId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let path = format!("/products/{}", ctx.text(FixtureKey::CartProductId)?);
                delete_ok(ctx, "Cleanup: cart product", &token, &path)
            }),
        TestCase::new(Suite::Cart, Position::new(40), "delete category")
            .cleanup()
            .reads(&[FixtureKey::OwnerToken, FixtureKey::CartCategoryId])
            .body(|ctx| {
                let token = owner(ctx)?;
                let path = format!("/categories/{}", ctx.text(FixtureKey::CartCategoryId)?);
                delete_ok(ctx, "Cleanup: cart category", &token, &path)?;
                ctx.note("Cart tests cleaned up temporary product and category.");
                Ok(())
            }),
    ]
}
