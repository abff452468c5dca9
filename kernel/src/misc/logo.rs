use crate::{
    config::{KERNEL_NAME, KERNEL_VERSION},
    println,
};

pub static OS_LOGO_HEADER: &str = "  ____ _
 / ___| | __ _ ___  __ _  _____      __
| |  _| |/ _` / __|/ _` |/ _ \\ \\ /\\ / /
| |_| | | (_| \\__ \\ (_| | (_) \\ V  V /
 \\____|_|\\__,_|___/\\__, |\\___/ \\_/\\_/
                   |___/";

pub fn print_logo() {
    println!("\n{}", OS_LOGO_HEADER);
    println!("{} kernel v{}\n", KERNEL_NAME, KERNEL_VERSION);
}
