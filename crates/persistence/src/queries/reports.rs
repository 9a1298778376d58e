// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report source queries.

use bus_station::TicketSale;
use bus_station_domain::TicketStatus;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::PrimitiveDateTime;
use tracing::debug;

use crate::data_models::to_db_datetime;
use crate::diesel_schema::{cities, routes, tickets, trips};
use crate::error::PersistenceError;

backend_fn! {
/// Loads every ticket whose trip departs within `[start, end)`.
///
/// When `city_ids` is non-empty only tickets on routes to those cities are
/// returned. Ticket status is not filtered; the report decides how each
/// status counts.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `start` - Earliest departure (inclusive)
/// * `end` - Latest departure (exclusive)
/// * `city_ids` - Destination filter, empty for all destinations
///
/// # Errors
///
/// Returns an error if the database query fails or a stored status is invalid.
pub fn load_ticket_sales(
    conn: &mut _,
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
    city_ids: &[i64],
) -> Result<Vec<TicketSale>, PersistenceError> {
    let start_str: String = to_db_datetime(start)?;
    let end_str: String = to_db_datetime(end)?;

    let rows: Vec<(i64, i64, Option<String>, String, i64)> = tickets::table
        .inner_join(trips::table.inner_join(routes::table.left_join(cities::table)))
        .filter(trips::departure_at.ge(&start_str))
        .filter(trips::departure_at.lt(&end_str))
        .select((
            routes::route_id,
            routes::destination_city_id,
            cities::city_name.nullable(),
            tickets::status,
            tickets::price_cents,
        ))
        .load(conn)?;

    debug!(
        rows = rows.len(),
        start = %start_str,
        end = %end_str,
        "Loaded ticket rows for report"
    );

    rows.into_iter()
        .filter(|(_, city_id, _, _, _)| city_ids.is_empty() || city_ids.contains(city_id))
        .map(|(route_id, _, destination_name, status, price_cents)| {
            let status: TicketStatus = status
                .parse()
                .map_err(|e| PersistenceError::corrupt("tickets.status", e))?;
            Ok(TicketSale {
                route_id,
                destination_name,
                status,
                price_cents,
            })
        })
        .collect()
}
}
