mod search;

#[ctor::ctor]
fn init() {
    colog::init();
}
