// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bus_station_domain::{Bus, Route, TicketStatus};

use crate::TicketSale;

pub fn create_test_route() -> Route {
    Route {
        route_id: 1,
        destination_city_id: 10,
        distance_km: 300,
        duration_minutes: 270,
    }
}

pub fn create_test_bus(seats_count: u32) -> Bus {
    Bus {
        bus_id: 5,
        plate_number: String::from("A123BC"),
        model: String::from("PAZ"),
        seats_count,
    }
}

pub fn sale(route_id: i64, destination: Option<&str>, status: TicketStatus, price: i64) -> TicketSale {
    TicketSale {
        route_id,
        destination_name: destination.map(String::from),
        status,
        price_cents: price,
    }
}
