//! Reference data written into every new budget file.
//!
//! Seeding writes base tables directly; none of it lands in the undo log.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{CashflowError, Result};
use crate::id::Id;
use crate::model::FlowKind;

/// Default category catalog: (flow, category, items).
pub const DEFAULT_CATALOG: &[(FlowKind, &str, &[&str])] = &[
    (
        FlowKind::In,
        "Gift",
        &[
            "Anniversary Gift",
            "Birthday Gift",
            "Christmas Gift",
            "Easter Gift",
            "Fathers Day Gift",
            "Mothers Day Gift",
            "Holiday Gift",
            "Congratulations Gift",
        ],
    ),
    (FlowKind::In, "Property Sales", &["Misc. Property Resale"]),
    (FlowKind::In, "Rebate", &["Misc. Rebate"]),
    (FlowKind::In, "Refund", &["Misc. Refund"]),
    (FlowKind::In, "Reimbursement", &["Misc. Reimbursement"]),
    (FlowKind::In, "Salary", &["Misc. Gross Pay", "Misc. Take Home Pay"]),
    (
        FlowKind::In,
        "Savings",
        &[
            "Appliance Fund",
            "Elective Surgery Fund",
            "Emergency Fund",
            "Furniture Fund",
            "Gift Fund",
            "Home Insurance Fund",
            "Home Repair Fund",
            "New Home Fund",
            "Next Month's Rent Fund",
            "Retirement Fund",
            "Spending Surplus Fund",
            "Vacation Fund",
            "Vehicle Insurance Fund",
            "Vehicle Maintenance Fund",
            "Vehicle Purchase Fund",
            "Vet Fund",
        ],
    ),
    (FlowKind::Out, "Business", &["Repairs And Maintenance", "Shipping"]),
    (FlowKind::Out, "Charitable", &["Donations Or Tithe", "Gifts"]),
    (
        FlowKind::Out,
        "Clothing",
        &["Clothes", "Laundry And Tailoring", "Cleaning"],
    ),
    (FlowKind::Out, "Debt", &["Misc"]),
    (FlowKind::Out, "Food", &["Dining Out", "Food Bill", "Grocery"]),
    (
        FlowKind::Out,
        "Health",
        &[
            "Allergist",
            "Chiropractor",
            "Dentist",
            "Doctor",
            "Eye Care",
            "Hospital",
            "Medicine",
            "Spa",
        ],
    ),
    (
        FlowKind::Out,
        "Housing",
        &[
            "Furniture",
            "Kitchenware",
            "Mortgage",
            "Real-Estate Taxes",
            "Rent",
            "Renters Insurance",
            "Repairs And Maintenance",
            "Safe Deposit Box",
            "Storage",
        ],
    ),
    (
        FlowKind::Out,
        "Insurance",
        &[
            "Car Insurance",
            "Dental Insurance",
            "Disability Insurance",
            "Homeowners Insurance",
            "Medical Insurance",
            "Renters Insurance",
            "Term Life Insurance",
            "Travel Insurance",
            "Vision Insurance",
        ],
    ),
    (
        FlowKind::Out,
        "Personal",
        &[
            "Cash",
            "Convention",
            "Firearm",
            "Education",
            "Gifts",
            "Hair Care",
            "Organization Dues",
            "Pet Care",
            "Sales",
            "Shipping",
            "Stationary",
            "Subscriptions",
            "Toiletries",
            "Veterinarian",
        ],
    ),
    (
        FlowKind::Out,
        "Recreation",
        &[
            "Blow",
            "Books",
            "Computer",
            "Electronics",
            "Entertainment",
            "Games",
            "Movies",
            "Sports",
        ],
    ),
    (
        FlowKind::Out,
        "Savings",
        &[
            "401K",
            "Auto Maintenance Fund",
            "Car Insurance Payment Fund",
            "Education",
            "Elective Surgery",
            "Emergency Fund",
            "Flex Spending Account",
            "Furniture Fund",
            "Gift Fund",
            "New Home Fund Standby",
            "New Home Fund",
            "Next Month's Rent",
            "Retirement Fund Standby",
            "Rothira",
            "Spending Surplus",
            "Used Vehicle Fund",
            "Vacation",
            "Vet Fund",
        ],
    ),
    (
        FlowKind::Out,
        "Taxes",
        &[
            "Federal Income Tax",
            "Federal Medicare Tax",
            "Federal Oasdi Social Security",
            "Income Tax Preparation",
            "Property Tax",
            "State Income Tax",
            "Vehicle Tax",
        ],
    ),
    (
        FlowKind::Out,
        "Transportation",
        &[
            "Auto Parts",
            "Bus Fair",
            "Car Wash",
            "Gas And Oil",
            "License And Registration",
            "Repairs And Tires",
            "Vehicle History",
        ],
    ),
    (
        FlowKind::Out,
        "Travel",
        &[
            "Cleaning",
            "Dining",
            "Transportation",
            "Groceries",
            "Entertainment",
            "Lodging",
            "Tips",
        ],
    ),
    (
        FlowKind::Out,
        "Utilities",
        &["Electricity", "Gas", "Internet", "Phone", "TV", "Water"],
    ),
];

/// Ids of the two permanent flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowIds {
    pub in_flow: Id,
    pub out_flow: Id,
}

impl FlowIds {
    pub fn get(&self, kind: FlowKind) -> &Id {
        match kind {
            FlowKind::In => &self.in_flow,
            FlowKind::Out => &self.out_flow,
        }
    }

    /// Read the flow ids from an existing store.
    ///
    /// # Errors
    ///
    /// Returns `CashflowError::MissingFlow` if either flow row is absent.
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Self {
            in_flow: load_flow_id(conn, FlowKind::In)?,
            out_flow: load_flow_id(conn, FlowKind::Out)?,
        })
    }
}

fn load_flow_id(conn: &Connection, kind: FlowKind) -> Result<Id> {
    let id: Option<Id> = conn
        .query_row(
            "SELECT id FROM flow WHERE name = ?",
            [kind.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|_| CashflowError::MissingFlow(kind.to_string()))?;
    id.ok_or_else(|| CashflowError::MissingFlow(kind.to_string()))
}

/// Insert the permanent "In" and "Out" flows.
pub fn prepopulate_permanent_data(conn: &Connection) -> Result<FlowIds> {
    let ids = FlowIds {
        in_flow: Id::new(),
        out_flow: Id::new(),
    };
    let mut stmt = conn.prepare("INSERT INTO flow (id, name) VALUES (?, ?)")?;
    for kind in [FlowKind::In, FlowKind::Out] {
        stmt.execute((ids.get(kind), kind.as_str()))?;
    }
    Ok(ids)
}

/// Insert the default category and item catalog.
pub fn prepopulate_mappable_data(conn: &Connection, flows: &FlowIds) -> Result<()> {
    let mut insert_category =
        conn.prepare("INSERT INTO category (id, name, flowId) VALUES (?, ?, ?)")?;
    let mut insert_item =
        conn.prepare("INSERT INTO item (id, name, categoryId) VALUES (?, ?, ?)")?;

    for (flow, category, items) in DEFAULT_CATALOG {
        let category_id = Id::new();
        insert_category.execute((&category_id, category, flows.get(*flow)))?;
        for item in items.iter() {
            insert_item.execute((Id::new(), item, &category_id))?;
        }
    }
    Ok(())
}
