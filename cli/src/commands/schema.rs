pub fn execute() {
    println!("{}", skillenhub::schema_sql());
}
