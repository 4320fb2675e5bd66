//! Order Repository
//!
//! Every mutation after creation is a conditional update on the status and
//! version the caller read; a lost race returns `None` instead of writing.

use super::{BaseRepository, RepoError, RepoResult, now_millis, parse_id};
use crate::db::models::{Order, OrderPatch, OrderScope};
use shared::order::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = match parse_id(TABLE, id) {
            Ok(thing) => thing,
            Err(RepoError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Orders visible in a scope, newest first
    pub async fn find_scoped(
        &self,
        scope: OrderScope,
        status: Option<OrderStatus>,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Order>> {
        let (scope_clause, who, restaurants) = match scope {
            OrderScope::All => ("true", None, Vec::new()),
            OrderScope::Customer(id) => ("customer = $who", Some(id), Vec::new()),
            OrderScope::Restaurants(ids) => ("restaurant INSIDE $restaurants", None, ids),
            OrderScope::DeliveryPartner(id) => (
                "(delivery_partner = $who OR (status = 'ready_for_pickup' AND !delivery_partner))",
                Some(id),
                Vec::new(),
            ),
        };
        let status_clause = if status.is_some() {
            " AND status = $status"
        } else {
            ""
        };
        let sql = format!(
            "SELECT * FROM order WHERE {}{} ORDER BY created_at DESC LIMIT $limit START $offset",
            scope_clause, status_clause
        );

        let orders: Vec<Order> = self
            .base
            .db()
            .query(sql)
            .bind(("who", who))
            .bind(("restaurants", restaurants))
            .bind(("status", status.map(|s| s.as_str())))
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Insert a new order; the caller has filled every derived field
    pub async fn create(&self, mut order: Order) -> RepoResult<Order> {
        let now = now_millis();
        order.id = None;
        order.version = 0;
        order.created_at = now;
        order.updated_at = now;

        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Apply `patch` only if the stored order still has `expected_status` and
    /// `expected_version`
    ///
    /// Returns `None` when another writer got there first.
    pub async fn update_if(
        &self,
        id: &str,
        expected_status: OrderStatus,
        expected_version: u64,
        mut patch: OrderPatch,
    ) -> RepoResult<Option<Order>> {
        let thing = parse_id(TABLE, id)?;
        patch.version = expected_version + 1;
        patch.updated_at = now_millis();

        let updated: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $thing MERGE $data \
                 WHERE status = $status AND version = $version RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("data", patch))
            .bind(("status", expected_status.as_str()))
            .bind(("version", expected_version))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Hard delete (admin only)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_id(TABLE, id)?;
        let deleted: Option<Order> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
