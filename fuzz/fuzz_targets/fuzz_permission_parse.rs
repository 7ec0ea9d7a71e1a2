// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for permission, role and page identifier parsing

#![no_main]

use aperture_authz::Evaluator;
use aperture_model::{gating_permission, Permission, Role};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parsed permissions print back to the same canonical text
        if let Ok(permission) = s.parse::<Permission>() {
            let canonical = permission.to_string();
            assert_eq!(canonical.parse::<Permission>().ok(), Some(permission));
        }

        let _ = s.parse::<Role>();

        // Arbitrary page ids never panic, and ungated ids stay open
        let engine = Evaluator::studio();
        if gating_permission(s).is_none() {
            assert!(engine.can_access_page(Role::Guest, s));
        }
    }
});
