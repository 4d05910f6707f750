//! Serves the order routes under `/orders/username/{username}`.

use lambda_runtime::Error;
use orders_api_lambda::handlers::handle_orders_event;

#[tokio::main]
async fn main() -> Result<(), Error> {
    orders_api_lambda::runtime::run("orders_runtime", handle_orders_event).await
}
