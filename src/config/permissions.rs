// Permission registry for the storefront dashboard
// Compiled into the binary; built once and shared read-only

use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::models::permission::{
    PermissionItem, PermissionModule, PermissionRegistry, PermissionSubgroup,
};

static STOREFRONT_REGISTRY: Lazy<Arc<PermissionRegistry>> = Lazy::new(|| {
    Arc::new(
        PermissionRegistry::new(PermissionConfig::storefront_modules())
            .expect("built-in storefront permission registry is invalid"),
    )
});

/// Permission configuration for the merchant dashboard
pub struct PermissionConfig;

impl PermissionConfig {
    /// Shared handle to the built-in registry
    pub fn storefront_registry() -> Arc<PermissionRegistry> {
        Arc::clone(&STOREFRONT_REGISTRY)
    }

    /// Module declarations in display order
    pub fn storefront_modules() -> Vec<PermissionModule> {
        vec![
            Self::dashboard(),
            Self::orders(),
            Self::products(),
            Self::categories(),
            Self::customers(),
            Self::reports(),
            Self::employees(),
            Self::affiliates(),
            Self::whatsapp(),
            Self::settings(),
        ]
    }

    fn dashboard() -> PermissionModule {
        PermissionModule::new("dashboard", "Dashboard")
            .with_description("Store overview and daily sales summary")
            .permission(PermissionItem::new("view", "View dashboard").with_default(true))
            .permission(
                PermissionItem::new("view_revenue", "View revenue totals").with_depends_on(["view"]),
            )
    }

    fn orders() -> PermissionModule {
        let status_change = |status: &str, label: &str| {
            PermissionItem::new(format!("change_status_{}", status), label)
                .with_depends_on(["change_any_status"])
        };

        PermissionModule::new("orders", "Orders")
            .with_description("Incoming orders and their lifecycle")
            .permission(PermissionItem::new("view", "View orders").with_default(true))
            .permission(PermissionItem::new("create", "Create orders"))
            .permission(PermissionItem::new("edit", "Edit orders"))
            .permission(PermissionItem::new("print", "Print order tickets"))
            .subgroup(
                PermissionSubgroup::new("status_changes", "Status Changes")
                    .with_description("Which order status transitions the employee may perform")
                    .permission(
                        PermissionItem::new("change_any_status", "Change order status")
                            .with_description("Required for every status transition below"),
                    )
                    .permission(status_change("confirmed", "Confirm order"))
                    .permission(status_change("preparing", "Mark as preparing"))
                    .permission(status_change("out_for_delivery", "Mark as out for delivery"))
                    .permission(status_change("delivered", "Mark as delivered"))
                    .permission(status_change("cancelled", "Cancel order")),
            )
            .subgroup(
                PermissionSubgroup::new("actions", "Order Actions")
                    .permission(
                        PermissionItem::new("delete_order_items", "Remove items from an order")
                            .with_depends_on(["edit"]),
                    )
                    .permission(
                        PermissionItem::new("apply_discount", "Apply discounts")
                            .with_depends_on(["edit"]),
                    )
                    .permission(PermissionItem::new("refund", "Refund orders")),
            )
    }

    fn products() -> PermissionModule {
        PermissionModule::new("products", "Products")
            .with_description("Catalog items, prices and availability")
            .permission(PermissionItem::new("view", "View products").with_default(true))
            .permission(PermissionItem::new("create", "Create products"))
            .permission(PermissionItem::new("edit", "Edit products"))
            .permission(PermissionItem::new("delete", "Delete products").with_depends_on(["edit"]))
            .permission(
                PermissionItem::new("toggle_availability", "Pause or resume products")
                    .with_depends_on(["edit"]),
            )
            .subgroup(
                PermissionSubgroup::new("catalog_extras", "Addons, Flavors & Variants")
                    .permission(
                        PermissionItem::new("manage_addons", "Manage addons")
                            .with_depends_on(["edit"]),
                    )
                    .permission(
                        PermissionItem::new("manage_flavors", "Manage flavors")
                            .with_depends_on(["edit"]),
                    )
                    .permission(
                        PermissionItem::new("manage_variants", "Manage color and size variants")
                            .with_description("Edit the color by size stock matrix")
                            .with_depends_on(["edit"]),
                    ),
            )
    }

    fn categories() -> PermissionModule {
        PermissionModule::new("categories", "Categories")
            .permission(PermissionItem::new("view", "View categories").with_default(true))
            .permission(PermissionItem::new("create", "Create categories"))
            .permission(PermissionItem::new("edit", "Edit categories"))
            .permission(PermissionItem::new("delete", "Delete categories").with_depends_on(["edit"]))
            .permission(PermissionItem::new("reorder", "Reorder categories").with_depends_on(["edit"]))
    }

    fn customers() -> PermissionModule {
        PermissionModule::new("customers", "Customers")
            .permission(PermissionItem::new("view", "View customers"))
            .permission(PermissionItem::new("edit", "Edit customers").with_depends_on(["view"]))
            .permission(
                PermissionItem::new("export", "Export customer list").with_depends_on(["view"]),
            )
    }

    fn reports() -> PermissionModule {
        PermissionModule::new("reports", "Reports")
            .permission(PermissionItem::new("view", "View reports"))
            .permission(PermissionItem::new("export", "Export reports").with_depends_on(["view"]))
            .permission(
                PermissionItem::new("view_financials", "View financial reports")
                    .with_depends_on(["view"]),
            )
    }

    fn employees() -> PermissionModule {
        PermissionModule::new("employees", "Employees")
            .with_description("Staff accounts and their permissions")
            .permission(PermissionItem::new("view", "View employees"))
            .permission(PermissionItem::new("create", "Invite employees").with_depends_on(["view"]))
            .permission(PermissionItem::new("edit", "Edit employees").with_depends_on(["view"]))
            .permission(PermissionItem::new("delete", "Remove employees").with_depends_on(["edit"]))
            .permission(
                PermissionItem::new("manage_permissions", "Manage employee permissions")
                    .with_depends_on(["edit"]),
            )
    }

    fn affiliates() -> PermissionModule {
        PermissionModule::new("affiliates", "Affiliates")
            .with_description("Affiliate program and commissions")
            .permission(PermissionItem::new("view", "View affiliates"))
            .permission(PermissionItem::new("invite", "Invite affiliates").with_depends_on(["view"]))
            .permission(
                PermissionItem::new("manage_commissions", "Manage commission rates")
                    .with_depends_on(["view"]),
            )
            .permission(
                PermissionItem::new("approve_payouts", "Approve commission payouts")
                    .with_depends_on(["manage_commissions"]),
            )
    }

    fn whatsapp() -> PermissionModule {
        PermissionModule::new("whatsapp", "WhatsApp")
            .with_description("WhatsApp Business connection and order notifications")
            .permission(PermissionItem::new("view_status", "View connection status"))
            .permission(
                PermissionItem::new("connect", "Connect or reconnect").with_depends_on(["view_status"]),
            )
            .permission(
                PermissionItem::new("disconnect", "Disconnect").with_depends_on(["connect"]),
            )
            .permission(
                PermissionItem::new("send_notifications", "Send order notifications")
                    .with_depends_on(["connect"]),
            )
            .permission(PermissionItem::new("edit_templates", "Edit message templates"))
    }

    fn settings() -> PermissionModule {
        PermissionModule::new("settings", "Store Settings")
            .permission(PermissionItem::new("view", "View settings"))
            .permission(PermissionItem::new("edit", "Edit settings").with_depends_on(["view"]))
            .permission(
                PermissionItem::new("manage_delivery_zones", "Manage delivery zones and fees")
                    .with_depends_on(["edit"]),
            )
            .permission(
                PermissionItem::new("manage_payment_methods", "Manage payment methods")
                    .with_depends_on(["edit"]),
            )
    }
}
