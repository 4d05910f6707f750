//! Serves the user routes (`/users`, `/users/username/{username}`).

use lambda_runtime::Error;
use orders_api_lambda::handlers::handle_users_event;

#[tokio::main]
async fn main() -> Result<(), Error> {
    orders_api_lambda::runtime::run("users_runtime", handle_users_event).await
}
