use std::collections::HashMap;

use timologio::checkout::*;

fn main() {
    // A receipt order needs nothing extra.
    let empty = HashMap::new();
    let order_type = OrderType::from_form_value(None);
    println!(
        "receipt order, no fields => {} errors",
        validate_submission(order_type, &empty).len()
    );

    // An invoice order with a missing tax office.
    let mut fields = HashMap::new();
    fields.insert("type_of_order".to_string(), "timologio".to_string());
    fields.insert("billing_vat".to_string(), "123456789".to_string());

    let order_type = OrderType::from_form_value(fields.get(FIELD_TYPE_OF_ORDER).map(String::as_str));
    for error in validate_submission(order_type, &fields) {
        println!("notice: {}", error.message);
    }

    // What lands on the order after a successful submission.
    for (meta_key, value) in collect_order_meta(&fields) {
        println!("order meta: {meta_key} = {value}");
    }
}
