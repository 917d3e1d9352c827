table! {
    counters (name) {
        name -> Text,
        value -> BigInt,
    }
}
