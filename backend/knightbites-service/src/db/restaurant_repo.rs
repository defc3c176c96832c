use super::{Executor, Params, QueryError, Statement};
use crate::models::Restaurant;

pub async fn list_restaurants(exec: &Executor) -> Result<Vec<Restaurant>, QueryError> {
    let stmt = Statement::new(
        "list_restaurants",
        "SELECT restaurantid AS restaurant_id, name, address, cuisine FROM Restaurant",
    )
    .then("ORDER BY restaurantid");
    exec.many(&stmt, &Params::new()).await
}
