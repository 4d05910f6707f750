//! Serves every route from one function, for local and single-function deployments.

use lambda_runtime::Error;
use orders_api_lambda::handlers::handle_api_event;

#[tokio::main]
async fn main() -> Result<(), Error> {
    orders_api_lambda::runtime::run("api_runtime", handle_api_event).await
}
