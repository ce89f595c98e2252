//! Card bill allocation: which installments of which purchases fall due in a
//! given month.

use crate::models::{CardRecord, ExpenseRecord, UpcomingBill};
use chrono::Datelike;

/// Longest installment plan a card purchase may carry.
pub const MAX_INSTALLMENTS: u32 = 120;

/// Months since year zero, so month arithmetic never wraps.
fn month_index(month: u32, year: i32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

/// Month index of the bill that carries the first installment. Purchases on
/// or after the closing day roll into the next bill.
fn first_bill(purchase: &ExpenseRecord, closing_day: u32) -> i64 {
    let rolled = i64::from(purchase.date.day() >= closing_day);
    month_index(purchase.date.month(), purchase.date.year()) + rolled
}

/// Month and year in which installment `index` (zero based) of a purchase is
/// billed.
pub fn installment_due(purchase: &ExpenseRecord, closing_day: u32, index: u32) -> (u32, i32) {
    let due = first_bill(purchase, closing_day) + i64::from(index);
    let month = due.rem_euclid(12) as u32 + 1;
    let year = due.div_euclid(12) as i32;
    (month, year)
}

/// Whether one of the purchase's installments lands in `month`/`year`.
fn installment_in(purchase: &ExpenseRecord, closing_day: u32, month: u32, year: i32) -> bool {
    let offset = month_index(month, year) - first_bill(purchase, closing_day);
    (0..i64::from(purchase.installments.max(1))).contains(&offset)
}

pub fn bills_for_month(
    cards: &[CardRecord],
    expenses: &[ExpenseRecord],
    month: u32,
    year: i32,
) -> Vec<UpcomingBill> {
    let mut bills: Vec<UpcomingBill> = cards
        .iter()
        .filter_map(|card| {
            let amount: f64 = expenses
                .iter()
                .filter(|expense| expense.card_id == Some(card.id))
                .filter(|purchase| installment_in(purchase, card.closing_day, month, year))
                .map(|purchase| purchase.amount / f64::from(purchase.installments.max(1)))
                .sum();
            (amount > 0.0).then(|| UpcomingBill {
                card_name: card.name.clone(),
                due_day: card.due_day,
                amount,
            })
        })
        .collect();

    bills.sort_by_key(|bill| bill.due_day);
    bills
}
