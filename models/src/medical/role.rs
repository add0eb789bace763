// models/src/medical/role.rs

use crate::status::wire_status;

wire_status! {
    /// Account role claim. Gates whole portals on the client side only.
    Role {
        Admin => "ADMIN", "Administrator", "bg-danger";
        Doctor => "DOCTOR", "Doctor", "bg-primary";
        Driver => "DRIVER", "Driver", "bg-info";
        Patient => "PATIENT", "Patient", "bg-success";
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Patient
    }
}
