// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

// Kept in sync with both `migrations/` and `migrations_mysql/` by hand.

diesel::table! {
    buses (bus_id) {
        bus_id -> BigInt,
        plate_number -> Text,
        model -> Text,
        seats_count -> Integer,
    }
}

diesel::table! {
    cities (city_id) {
        city_id -> BigInt,
        city_name -> Text,
        is_region -> Integer,
    }
}

diesel::table! {
    drivers (driver_id) {
        driver_id -> BigInt,
        full_name -> Text,
    }
}

diesel::table! {
    routes (route_id) {
        route_id -> BigInt,
        destination_city_id -> BigInt,
        distance_km -> Integer,
        duration_minutes -> Integer,
    }
}

diesel::table! {
    sessions (session_id) {
        session_id -> BigInt,
        session_token -> Text,
        user_id -> BigInt,
        created_at -> Text,
        last_activity_at -> Text,
        expires_at -> Text,
    }
}

diesel::table! {
    tickets (ticket_id) {
        ticket_id -> BigInt,
        trip_id -> BigInt,
        seat_number -> Integer,
        purchased_at -> Text,
        price_cents -> BigInt,
        payment_type -> Text,
        sold_by_user_id -> BigInt,
        destination_city_id -> BigInt,
        status -> Text,
    }
}

diesel::table! {
    trips (trip_id) {
        trip_id -> BigInt,
        route_id -> BigInt,
        bus_id -> BigInt,
        driver_id -> BigInt,
        departure_at -> Text,
        arrival_at -> Text,
        price_cents -> BigInt,
        available_seats -> Integer,
        status -> Text,
    }
}

diesel::table! {
    users (user_id) {
        user_id -> BigInt,
        login_name -> Text,
        full_name -> Text,
        password_hash -> Text,
        role -> Text,
        created_at -> Text,
        last_login_at -> Nullable<Text>,
    }
}

diesel::joinable!(routes -> cities (destination_city_id));
diesel::joinable!(sessions -> users (user_id));
diesel::joinable!(tickets -> trips (trip_id));
diesel::joinable!(tickets -> users (sold_by_user_id));
diesel::joinable!(trips -> buses (bus_id));
diesel::joinable!(trips -> drivers (driver_id));
diesel::joinable!(trips -> routes (route_id));

diesel::allow_tables_to_appear_in_same_query!(
    buses, cities, drivers, routes, sessions, tickets, trips, users,
);
