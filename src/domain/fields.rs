// Centralized canonical-field configuration for order/template ingestion.
//
// Goal: keep header matching, merge policy membership and carrier field
// limits in one place instead of scattering alias lists across use cases.

use once_cell::sync::Lazy;
use std::collections::HashMap;

// Canonical field names. All source headers ultimately resolve to one of
// these (or stay unmapped and remain usable as a literal key).
pub const CONTACT_NAME: &str = "ContactName";
pub const COMPANY: &str = "Company";
pub const ADDRESS_LINE_1: &str = "AddressLine1";
pub const ADDRESS_LINE_2: &str = "AddressLine2";
pub const CITY: &str = "City";
pub const PROVINCE: &str = "Province";
pub const POSTAL_CODE: &str = "PostalCode";
pub const COUNTRY: &str = "Country";
pub const PHONE: &str = "Phone";
pub const EMAIL: &str = "Email";
pub const REFERENCE: &str = "Reference";
pub const QUANTITY: &str = "Quantity";
pub const AMOUNT: &str = "Amount";
pub const SERVICE_CODE: &str = "ServiceCode";
pub const PACKAGE_CATEGORY: &str = "PackageCategory";
pub const LENGTH: &str = "Length";
pub const WIDTH: &str = "Width";
pub const HEIGHT: &str = "Height";
pub const WEIGHT: &str = "Weight";
pub const DESCRIPTION: &str = "Description";
pub const CLIENT_ID: &str = "ClientId";

pub const ALL_FIELDS: &[&str] = &[
    CONTACT_NAME,
    COMPANY,
    ADDRESS_LINE_1,
    ADDRESS_LINE_2,
    CITY,
    PROVINCE,
    POSTAL_CODE,
    COUNTRY,
    PHONE,
    EMAIL,
    REFERENCE,
    QUANTITY,
    AMOUNT,
    SERVICE_CODE,
    PACKAGE_CATEGORY,
    LENGTH,
    WIDTH,
    HEIGHT,
    WEIGHT,
    DESCRIPTION,
    CLIENT_ID,
];

/// Fields that must be present and non-blank before a row can ship.
pub const REQUIRED_FIELDS: &[&str] = &[
    CONTACT_NAME,
    ADDRESS_LINE_1,
    CITY,
    PROVINCE,
    POSTAL_CODE,
    COUNTRY,
];

/// Fields whose merge policy is concatenation rather than overwrite.
pub const MERGEABLE_FIELDS: &[&str] =
    &[CONTACT_NAME, ADDRESS_LINE_1, ADDRESS_LINE_2, DESCRIPTION];

// NOTE:
// - Synonyms are matched against a collapsed header: lowercase, trimmed,
//   internal whitespace/underscores/hyphens removed.
// - "postal/zip" keeps its slash on purpose; only separators collapse.
const SYNONYMS: &[(&str, &[&str])] = &[
    (
        CONTACT_NAME,
        &[
            "name",
            "contactname",
            "recipient",
            "recipientname",
            "customer",
            "customername",
            "fullname",
            "shipto",
            "shiptoname",
            "attention",
            "attn",
            "buyer",
            "buyername",
        ],
    ),
    (
        COMPANY,
        &["company", "companyname", "organization", "organisation", "business"],
    ),
    (
        ADDRESS_LINE_1,
        &[
            "address",
            "address1",
            "addressline1",
            "street",
            "streetaddress",
            "shippingaddress",
            "addr1",
            "line1",
        ],
    ),
    (
        ADDRESS_LINE_2,
        &["address2", "addressline2", "addr2", "line2", "suite", "apt", "unit"],
    ),
    (CITY, &["city", "town", "municipality", "shippingcity"]),
    (
        PROVINCE,
        &[
            "province",
            "state",
            "provstate",
            "provincestate",
            "stateprovince",
            "prov",
            "region",
            "shippingstate",
        ],
    ),
    (
        POSTAL_CODE,
        &[
            "postalcode",
            "postal code",
            "zipcode",
            "zip",
            "postal",
            "zip code",
            "postcode",
            "postal/zip",
            "zippostalcode",
            "shippingzip",
        ],
    ),
    (COUNTRY, &["country", "countrycode", "nation", "shippingcountry"]),
    (
        PHONE,
        &[
            "phone",
            "phonenumber",
            "telephone",
            "tel",
            "mobile",
            "cell",
            "voicenumber",
            "contactphone",
        ],
    ),
    (
        EMAIL,
        &["email", "emailaddress", "buyeremail", "contactemail"],
    ),
    (
        REFERENCE,
        &[
            "reference",
            "ref",
            "order",
            "orderid",
            "ordernumber",
            "orderno",
            "customerref",
            "customerreference",
            "transactionid",
            "invoice",
            "invoiceno",
            "invoicenumber",
        ],
    ),
    (
        QUANTITY,
        &["quantity", "qty", "units", "itemcount", "numberofitems"],
    ),
    (
        AMOUNT,
        &[
            "amount",
            "total",
            "ordertotal",
            "totalamount",
            "grandtotal",
            "price",
            "salesamount",
            "amountpaid",
        ],
    ),
    (
        SERVICE_CODE,
        &[
            "service",
            "servicecode",
            "servicetype",
            "shippingservice",
            "shippingmethod",
            "carrierservice",
            "deliveryservice",
        ],
    ),
    (
        PACKAGE_CATEGORY,
        &[
            "category",
            "packagecategory",
            "packagetype",
            "producttype",
            "productcategory",
            "devicetype",
            "itemcategory",
        ],
    ),
    (LENGTH, &["length", "lengthcm", "depth"]),
    (WIDTH, &["width", "widthcm"]),
    (HEIGHT, &["height", "heightcm"]),
    (
        WEIGHT,
        &["weight", "weightkg", "weightg", "mass", "grams", "kilograms"],
    ),
    (
        DESCRIPTION,
        &[
            "description",
            "desc",
            "itemdescription",
            "productdescription",
            "details",
            "notes",
            "contents",
        ],
    ),
    (
        CLIENT_ID,
        &["clientid", "clientno", "customerid", "customerno", "accountid", "account"],
    ),
];

/// Collapsed synonym -> canonical field name.
static SYNONYM_TABLE: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for (field, aliases) in SYNONYMS {
        // The canonical name itself always resolves.
        table.insert(collapse_header(field), *field);
        for alias in *aliases {
            table.insert(collapse_header(alias), *field);
        }
    }
    table
});

/// Collapse a raw header for dictionary lookup: lowercase, trim, and drop
/// internal whitespace, underscores and hyphens.
pub fn collapse_header(header: &str) -> String {
    header
        .trim()
        .trim_matches('"')
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect()
}

/// Resolve a raw header to a canonical field name, if the dictionary knows it.
pub fn lookup_canonical(header: &str) -> Option<&'static str> {
    SYNONYM_TABLE.get(collapse_header(header).as_str()).copied()
}

pub fn is_canonical(name: &str) -> bool {
    ALL_FIELDS.contains(&name)
}

pub fn is_mergeable(field: &str) -> bool {
    MERGEABLE_FIELDS.contains(&field)
}

/// Carrier hard field-length limits, in characters (not bytes).
pub fn char_limit(field: &str) -> Option<usize> {
    match field {
        CONTACT_NAME | COMPANY | ADDRESS_LINE_1 | ADDRESS_LINE_2 => Some(44),
        CITY => Some(40),
        PROVINCE => Some(20),
        POSTAL_CODE => Some(14),
        PHONE => Some(25),
        EMAIL => Some(70),
        REFERENCE => Some(35),
        SERVICE_CODE => Some(32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_header() {
        assert_eq!(collapse_header("  Postal Code "), "postalcode");
        assert_eq!(collapse_header("ZIP_CODE"), "zipcode");
        assert_eq!(collapse_header("ship-to-name"), "shiptoname");
        assert_eq!(collapse_header("Postal/Zip"), "postal/zip");
    }

    #[test]
    fn test_lookup_canonical() {
        assert_eq!(lookup_canonical("Zip Code"), Some(POSTAL_CODE));
        assert_eq!(lookup_canonical("POSTAL/ZIP"), Some(POSTAL_CODE));
        assert_eq!(lookup_canonical("Ship To Name"), Some(CONTACT_NAME));
        assert_eq!(lookup_canonical("ContactName"), Some(CONTACT_NAME));
        assert_eq!(lookup_canonical("SKU"), None);
    }

    #[test]
    fn test_membership_tables() {
        assert!(is_mergeable(ADDRESS_LINE_1));
        assert!(!is_mergeable(REFERENCE));
        assert!(REQUIRED_FIELDS.contains(&POSTAL_CODE));
        assert_eq!(char_limit(REFERENCE), Some(35));
        assert_eq!(char_limit(WEIGHT), None);
    }
}
