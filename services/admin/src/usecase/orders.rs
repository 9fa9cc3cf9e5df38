use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{Mailer, OrderRepository};
use crate::domain::types::{Order, OrderDraft};
use crate::error::AdminServiceError;
use crate::templates::{OrderNotice, order_status_email};

pub struct ListOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListOrdersUseCase<O> {
    pub async fn execute(&self) -> Result<Vec<Order>, AdminServiceError> {
        self.orders.list().await
    }
}

pub struct CreateOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> CreateOrderUseCase<O> {
    pub async fn execute(&self, draft: OrderDraft) -> Result<Order, AdminServiceError> {
        let order = Order::from_draft(draft, Utc::now());
        self.orders.create(&order).await?;
        tracing::info!(order_id = %order.id, service = %order.service, "created order");
        Ok(order)
    }
}

pub struct UpdateOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> UpdateOrderUseCase<O> {
    pub async fn execute(&self, id: Uuid, draft: OrderDraft) -> Result<Order, AdminServiceError> {
        let mut order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::NotFound)?;
        order.apply_draft(draft, Utc::now());
        self.orders.update(&order).await?;
        Ok(order)
    }
}

pub struct DeleteOrderUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> DeleteOrderUseCase<O> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        if !self.orders.delete(id).await? {
            return Err(AdminServiceError::NotFound);
        }
        Ok(())
    }
}

/// Email the customer the order's current status, with an optional note.
pub struct SendOrderUpdateUseCase<O, M>
where
    O: OrderRepository,
    M: Mailer,
{
    pub orders: O,
    pub mailer: M,
}

impl<O, M> SendOrderUpdateUseCase<O, M>
where
    O: OrderRepository,
    M: Mailer,
{
    pub async fn execute(&self, id: Uuid, message: Option<&str>) -> Result<(), AdminServiceError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::NotFound)?;

        let reference = order.reference();
        let message = message.map(str::trim).filter(|m| !m.is_empty());
        let email = order_status_email(
            &order.customer_email,
            &OrderNotice {
                customer_name: &order.customer_name,
                reference: &reference,
                status: order.fulfillment_status,
                message,
            },
        );
        self.mailer
            .send(&email)
            .await
            .map_err(AdminServiceError::Delivery)?;
        tracing::info!(order_id = %order.id, status = %order.fulfillment_status, "order update sent");
        Ok(())
    }
}
