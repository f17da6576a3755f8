use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    category::{Category, CategoryId},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, date_attribute, format_currency,
    },
    money::{MAX_TRANSACTION_AMOUNT, Money},
    period::supported_years,
    transaction::core::{NewTransaction, TransactionType},
};

const FORM_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

/// The raw fields posted by the new transaction form.
///
/// Every field is kept as text so that a missing or malformed field is
/// reported by [TransactionForm::validate] instead of rejected by the extractor.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionForm {
    /// "income" or "expense".
    pub transaction_type: String,
    /// A positive decimal amount, e.g. "12.50".
    pub amount: String,
    /// A `yyyy-MM-dd` date.
    pub transaction_date: String,
    /// The ID of an existing category.
    pub category_id: String,
    /// Optional free text.
    pub description: String,
}

impl TransactionForm {
    /// Check the form fields and convert them into a [NewTransaction].
    ///
    /// The date must fall in a year that the transactions page can show
    /// relative to `today`. Whether the category exists is checked later by
    /// the store.
    ///
    /// # Errors
    /// Returns the first invalid field as an:
    /// - [Error::InvalidAmount] if the amount is not a decimal with at most two decimal places,
    /// - [Error::NonPositiveAmount] if the amount is zero or negative,
    /// - [Error::AmountTooLarge] if the amount is above [MAX_TRANSACTION_AMOUNT],
    /// - [Error::InvalidDate] if the date is not a `yyyy-MM-dd` calendar date,
    /// - [Error::DateOutOfRange] if the date's year cannot be viewed,
    /// - [Error::InvalidCategory] if the category ID is not an integer,
    /// - [Error::InvalidTransactionType] if the type is not income or expense.
    pub fn validate(&self, today: Date) -> Result<NewTransaction, Error> {
        let amount = Money::parse(&self.amount)?;

        if !amount.is_positive() {
            return Err(Error::NonPositiveAmount);
        }

        if amount > MAX_TRANSACTION_AMOUNT {
            return Err(Error::AmountTooLarge(format_currency(MAX_TRANSACTION_AMOUNT)));
        }

        let date = parse_form_date(&self.transaction_date)?;

        let years = supported_years(today);
        if !years.contains(&date.year()) {
            return Err(Error::DateOutOfRange {
                date: self.transaction_date.trim().to_owned(),
                earliest: *years.start(),
                latest: *years.end(),
            });
        }

        let category_id = self
            .category_id
            .trim()
            .parse::<CategoryId>()
            .map_err(|_| Error::InvalidCategory)?;

        let transaction_type = self.transaction_type.parse::<TransactionType>()?;

        Ok(NewTransaction {
            amount,
            date,
            description: self.description.trim().to_owned(),
            category_id,
            transaction_type,
        })
    }
}

fn parse_form_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), FORM_DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

pub struct TransactionFormDefaults {
    pub transaction_type: TransactionType,
    pub date: Date,
}

pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults,
    categories: &[Category],
) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                div class="flex items-center gap-3"
                {
                    input
                        name="transaction_type"
                        id="transaction-type-expense"
                        type="radio"
                        value=(TransactionType::Expense.as_str())
                        checked[is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-expense"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        (TransactionType::Expense.label())
                    }
                }

                div class="flex items-center gap-3"
                {
                    input
                        name="transaction_type"
                        id="transaction-type-income"
                        type="radio"
                        value=(TransactionType::Income.as_str())
                        checked[!is_expense]
                        required
                        tabindex="0"
                        class=(FORM_RADIO_INPUT_STYLE);

                    label
                        for="transaction-type-income"
                        class=(FORM_RADIO_LABEL_STYLE)
                    {
                        (TransactionType::Income.label())
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.01"
                    min="0.01"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="transaction_date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="transaction_date"
                id="transaction_date"
                type="date"
                value=(date_attribute(defaults.date))
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category_id"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category_id"
                id="category_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a category" }

                @for category in categories {
                    option value=(category.id) { (category.name) }
                }
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
