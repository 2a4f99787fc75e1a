use crate::model::{NormalizeError, PendingVacancy, RawRecord};
use crate::utils::{format_epoch_date, truncate_iso_date};
use serde_json::{Map, Value};
use tracing::warn;

/// Where one provider keeps each attribute. Paths descend into nested objects.
struct FieldNames {
    title: &'static [&'static str],
    link: &'static [&'static str],
    salary: &'static [&'static str],
    date: &'static [&'static str],
    currency: &'static [&'static str],
}

const SUPERJOB_FIELDS: FieldNames = FieldNames {
    title: &["profession"],
    link: &["link"],
    salary: &["payment_from"],
    date: &["date_published"],
    currency: &["currency"],
};

const HEADHUNTER_FIELDS: FieldNames = FieldNames {
    title: &["name"],
    link: &["alternate_url"],
    salary: &["salary", "from"],
    date: &["published_at"],
    currency: &["salary", "currency"],
};

/// SuperJob names win, HeadHunter names are the fallback, whatever the record's source.
const PRECEDENCE: [&FieldNames; 2] = [&SUPERJOB_FIELDS, &HEADHUNTER_FIELDS];

fn lookup<'a>(fields: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = fields;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last).filter(|v| !v.is_null())
}

fn first_present<'a>(
    raw: &'a RawRecord,
    pick: impl Fn(&FieldNames) -> &'static [&'static str],
) -> Option<&'a Value> {
    PRECEDENCE
        .into_iter()
        .find_map(|names| lookup(&raw.fields, pick(names)))
}

fn required_string(
    raw: &RawRecord,
    attribute: &'static str,
    pick: impl Fn(&FieldNames) -> &'static [&'static str],
) -> Result<String, NormalizeError> {
    first_present(raw, pick)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(NormalizeError::MalformedRecord(attribute))
}

fn normalize_date(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(format_epoch_date),
        Value::String(s) => truncate_iso_date(s),
        _ => None,
    }
}

/// Maps a provider record onto the canonical fields. No filtering happens here.
pub fn normalize(raw: &RawRecord) -> Result<PendingVacancy, NormalizeError> {
    let title = required_string(raw, "title", |n| n.title)?;
    let link = required_string(raw, "link", |n| n.link)?;
    let date = first_present(raw, |n| n.date)
        .and_then(normalize_date)
        .ok_or(NormalizeError::MalformedRecord("date"))?;

    // zero means the employer left the field empty
    let salary_raw = first_present(raw, |n| n.salary)
        .and_then(Value::as_f64)
        .filter(|s| *s != 0.0);

    let currency = first_present(raw, |n| n.currency)
        .and_then(Value::as_str)
        .map(str::to_uppercase);

    if salary_raw.is_some() && currency.is_none() {
        return Err(NormalizeError::MalformedRecord("currency"));
    }

    Ok(PendingVacancy {
        title,
        link,
        salary_raw,
        date,
        currency,
    })
}

/// Normalizes a batch, skipping records that fail.
pub fn normalize_all(records: &[RawRecord]) -> Vec<PendingVacancy> {
    records
        .iter()
        .filter_map(|raw| match normalize(raw) {
            Ok(pending) => Some(pending),
            Err(e) => {
                warn!("Skipping {} record: {}", raw.source, e);
                None
            }
        })
        .collect()
}
