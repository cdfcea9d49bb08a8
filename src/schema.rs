use diesel::prelude::*;

diesel::table! {
    #[sql_name = "Thresholds"]
    thresholds (id) {
        id -> Integer,
        cold -> Double,
        hot -> Double,
    }
}

diesel::table! {
    #[sql_name = "Temperatures"]
    temperatures (id) {
        id -> Integer,
        temperature -> Double,
    }
}

/// Key of the only row `Thresholds` is allowed to hold.
pub const THRESHOLDS_ROW: i32 = 1;

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = thresholds)]
pub struct ThresholdsDTO {
    pub id: i32,
    pub cold: f64,
    pub hot: f64,
}

#[derive(Debug, Clone, Queryable)]
pub struct TemperatureDTO {
    pub id: i32,
    pub temperature: f64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = temperatures)]
pub struct AddTemperatureDTO {
    pub temperature: f64,
}
