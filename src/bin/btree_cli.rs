//! Interactive food-item database demo, mirroring the reference
//! program's menu: load a CSV, then search/browse/add/remove items
//! against the tree until the user exits.

use bptree_kv::food::{self, normalize_name};
use bptree_kv::{Config, Db, Record};
use std::io::{self, Write};

fn prompt(msg: &str) -> String {
    print!("{msg}");
    io::stdout().flush().ok();
    let mut line = String::new();
    io::stdin().read_line(&mut line).ok();
    line.trim_end_matches(['\n', '\r']).to_string()
}

fn print_menu() {
    println!("\n=====================================");
    println!("            FOOD DB MENU             ");
    println!("=====================================");
    println!(" 1) Search by exact name");
    println!(" 2) Search by prefix");
    println!(" 3) Browse by first-letter range");
    println!(" 4) Show stats (total items)");
    println!(" 5) Print B+ tree (debug)");
    println!(" 6) Add or update an item");
    println!(" 7) Remove an item (with confirm)");
    println!(" 0) Exit");
    println!("-------------------------------------");
}

fn print_item(label: &str, name: &str, rec: &Record) {
    println!("\n{label}:");
    println!(" Name:     {name}");
    println!(" Calories: {}", rec.calories);
    println!(" Protein:  {}", rec.protein);
    println!(" Cost:     ${:.2}", rec.cost);
}

fn main() {
    println!("=== CSV Demo Program ===");
    let filename = prompt("Enter CSV filename (in same folder as exe): ");

    let db_path = "tree_data.bin";
    let _ = std::fs::remove_file(db_path);

    let mut db = match Db::open(Config::new(db_path)) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("ERROR: failed to open database: {e}");
            std::process::exit(1);
        }
    };

    println!("\nLoading CSV...");
    let count = match food::load_csv_into_db(std::path::Path::new(&filename), &mut db) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("ERROR: failed to load CSV: {e}");
            std::process::exit(1);
        }
    };
    println!("Loaded CSV. Inserted {count} rows.");

    if count == 0 {
        println!("\nERROR: No items loaded from CSV!");
        println!("Please check:");
        println!("  1. File exists and path is correct");
        println!("  2. CSV format is correct (name,protein,calories,cost)");
        println!("  3. File has data rows (not just header)");
        std::process::exit(1);
    }
    println!("Successfully inserted {count} items.");

    let stats = db.stats();
    println!("\nTree depth = {}", stats.tree_depth);
    println!("Pages in file = {}", stats.page_count);

    loop {
        print_menu();
        let choice = prompt("Enter choice: ");
        if choice.is_empty() {
            continue;
        }

        match choice.as_bytes()[0] {
            b'1' => {
                println!("\n=== Exact Name Search ===");
                let raw = prompt("Enter full item name: ");
                let name = normalize_name(&raw);
                match db.get(&name) {
                    Ok(Some(rec)) => print_item("FOUND ITEM", &name, &rec),
                    Ok(None) => println!("\nItem not found."),
                    Err(e) => eprintln!("ERROR: {e}"),
                }
            }
            b'2' => {
                println!("\n=== Prefix Search ===");
                let prefix = prompt("Enter prefix: ");
                match db.search_prefix(&prefix) {
                    Ok(results) if results.is_empty() => {
                        println!("\nNo items found with that prefix.");
                    }
                    Ok(results) => {
                        println!("\nFound {} item(s) with prefix \"{prefix}\":", results.len());
                        for (_, rec) in results.iter().take(50) {
                            println!(
                                " - {}  (P={}, Cals={}, ${:.2})",
                                rec.name(),
                                rec.protein,
                                rec.calories,
                                rec.cost
                            );
                        }
                        if results.len() > 50 {
                            println!("   ... (showing first 50)");
                        }
                    }
                    Err(e) => eprintln!("ERROR: {e}"),
                }
            }
            b'3' => {
                println!("\n=== Browse by First-Letter Range ===");
                let s1 = prompt("Enter starting letter (e.g., A): ");
                let s2 = prompt("Enter ending letter (e.g., Z): ");
                let (Some(c1), Some(c2)) = (s1.chars().next(), s2.chars().next()) else {
                    println!("Invalid input.");
                    continue;
                };
                match db.browse_by_first_letter(c1, c2) {
                    Ok(results) if results.is_empty() => {
                        println!("\nNo items found in that letter range.");
                    }
                    Ok(results) => {
                        println!("\nItems with first letter between '{c1}' and '{c2}':");
                        for (_, rec) in results.iter().take(50) {
                            println!(
                                " - {}  (P={}, Cals={}, ${:.2})",
                                rec.name(),
                                rec.protein,
                                rec.calories,
                                rec.cost
                            );
                        }
                        if results.len() > 50 {
                            println!("   ... (showing first 50)");
                        }
                        println!("Total items in range: {}", results.len());
                    }
                    Err(e) => eprintln!("ERROR: {e}"),
                }
            }
            b'4' => {
                println!("\n=== Stats ===");
                let s = db.stats();
                println!("Tree depth:       {}", s.tree_depth);
                println!("Pages in file:    {}", s.page_count);
                println!("Buffer pool size: {}", s.buffer_pool_size);
                println!(
                    "Pool fetches/hits/misses/evictions/writes: {}/{}/{}/{}/{}",
                    s.pool_fetches, s.pool_hits, s.pool_misses, s.pool_evictions, s.pool_writes
                );
            }
            b'5' => {
                println!("\n=== B+ TREE STRUCTURE ===");
                match db.print_tree() {
                    Ok(dump) => print!("{dump}"),
                    Err(e) => eprintln!("ERROR: {e}"),
                }
            }
            b'6' => {
                println!("\n=== Add or Update Item ===");
                let raw = prompt("Enter item name: ");
                let name = normalize_name(&raw);
                let existing = db.get(&name).ok().flatten();

                let (mut protein, mut calories, mut cost) = match &existing {
                    Some(rec) => {
                        print_item("Item already exists", &name, rec);
                        let yn = prompt("\nDo you want to update this item? (Y/N): ");
                        if !yn.starts_with(['y', 'Y']) {
                            println!("Update cancelled.");
                            continue;
                        }
                        (rec.protein, rec.calories, rec.cost)
                    }
                    None => {
                        println!("\nItem not found; creating new item.");
                        (0, 0, 0.0)
                    }
                };

                println!("\nPress Enter to keep the existing value.");
                let p_line = prompt(&format!("New Protein (grams) [{protein}]: "));
                if let Ok(v) = p_line.parse() {
                    protein = v;
                }
                let c_line = prompt(&format!("New Calories [{calories}]: "));
                if let Ok(v) = c_line.parse() {
                    calories = v;
                }
                let cost_line = prompt(&format!("New Cost ($) [{cost}]: "));
                if let Ok(v) = cost_line.parse() {
                    cost = v;
                }

                let rec = Record::new(&name, protein, calories, cost);
                if let Err(e) = db.put(&name, rec) {
                    eprintln!("ERROR: {e}");
                    continue;
                }

                println!("\nItem {} successfully!", if existing.is_some() { "updated" } else { "inserted" });
                if let Ok(Some(verify)) = db.get(&name) {
                    print_item("Current Item Details", &name, &verify);
                }
            }
            b'7' => {
                println!("\n=== Remove Item ===");
                let raw = prompt("Enter full item name to remove: ");
                let name = normalize_name(&raw);

                match db.get(&name) {
                    Ok(Some(rec)) => {
                        print_item("Item found", &name, &rec);
                        let yn = prompt("\nAre you sure you want to delete this item? (Y/N): ");
                        if !yn.starts_with(['y', 'Y']) {
                            println!("Delete cancelled.");
                            continue;
                        }
                        match db.delete(&name) {
                            Ok(true) => println!("\nItem \"{name}\" was removed successfully."),
                            Ok(false) => println!("\nRemove failed (item may have already been removed)."),
                            Err(e) => eprintln!("ERROR: {e}"),
                        }
                    }
                    Ok(None) => println!("\nItem not found — nothing to remove."),
                    Err(e) => eprintln!("ERROR: {e}"),
                }
            }
            b'0' => break,
            _ => println!("Unknown option. Please choose 0-7."),
        }
    }

    if let Err(e) = db.flush() {
        eprintln!("Warning: failed to flush: {e}");
    }
    println!("\n=== Demo Complete ===");
}
