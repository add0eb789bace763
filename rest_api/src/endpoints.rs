// rest_api/src/endpoints.rs

// Backend routes, relative to the configured base URL.

pub const AMBULANCES: &str = "/api/ambulances";
pub const BOOKINGS: &str = "/api/ambulance-bookings";
pub const EMERGENCIES: &str = "/api/emergencies";
pub const MY_DRIVER_EMERGENCIES: &str = "/api/emergencies/my-driver-emergencies";
pub const DOCTORS: &str = "/api/doctors";
pub const CLINICS: &str = "/api/clinics";
pub const USERS: &str = "/api/users";
pub const APPOINTMENTS: &str = "/api/appointments";
pub const LEAVE_REQUESTS: &str = "/api/leave-requests";
pub const REVIEWS: &str = "/api/reviews";
pub const PHARMACY_ORDERS: &str = "/api/pharmacy-orders";
pub const SURGERY_CONSULTATIONS: &str = "/api/surgery-consultations";
pub const AUTH_VALIDATE: &str = "/api/auth/validate";
pub const AUTH_LOGOUT: &str = "/api/auth/logout";

pub fn item(collection: &str, id: i64) -> String {
    format!("{}/{}", collection, id)
}

pub fn accept(collection: &str, id: i64) -> String {
    format!("{}/{}/accept", collection, id)
}

pub fn status(collection: &str, id: i64) -> String {
    format!("{}/{}/status", collection, id)
}

pub fn user_role(user_id: i64) -> String {
    format!("{}/{}/role", USERS, user_id)
}
