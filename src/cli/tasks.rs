// cli/tasks.rs — task subcommands.
//
// Each command loads the collection from the task file, runs one store
// operation, and saves the collection back when it mutated. The daemon is
// not involved; CLI and server share the file, not the process.

use anyhow::Result;

use crate::config::TaskdConfig;
use crate::store::persist::TaskFile;
use crate::store::TaskStore;

async fn open(config: &TaskdConfig) -> (TaskFile, TaskStore) {
    let file = TaskFile::at(config.tasks_file.clone());
    let store = TaskStore::from_records(file.load().await);
    (file, store)
}

fn print_stats(store: &TaskStore) {
    let stats = store.stats();
    println!(
        "total: {} | pending: {} | done: {} ({}%)",
        stats.total, stats.pending, stats.done, stats.completion_percentage
    );
}

pub async fn add(config: &TaskdConfig, title: &str, description: Option<String>) -> Result<()> {
    let (file, mut store) = open(config).await;
    let task = store.create(title, description)?;
    file.save(store.tasks()).await?;
    println!("Added: {task}");
    print_stats(&store);
    Ok(())
}

pub async fn list(config: &TaskdConfig, done: Option<bool>) -> Result<()> {
    let (_file, store) = open(config).await;
    let tasks = store.list(done);
    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    for task in &tasks {
        println!("  {task}");
    }
    Ok(())
}

pub async fn get(config: &TaskdConfig, id: u64) -> Result<()> {
    let (_file, store) = open(config).await;
    let task = store.get(id)?;
    println!("{task}");
    if let Some(description) = &task.description {
        println!("  {description}");
    }
    Ok(())
}

pub async fn toggle(config: &TaskdConfig, id: u64) -> Result<()> {
    let (file, mut store) = open(config).await;
    let task = store.toggle(id)?;
    file.save(store.tasks()).await?;
    println!("Toggled: {task}");
    Ok(())
}

pub async fn delete(config: &TaskdConfig, id: u64) -> Result<()> {
    let (file, mut store) = open(config).await;
    store.delete(id)?;
    file.save(store.tasks()).await?;
    println!("Deleted task {id}");
    print_stats(&store);
    Ok(())
}

pub async fn stats(config: &TaskdConfig) -> Result<()> {
    let (_file, store) = open(config).await;
    print_stats(&store);
    Ok(())
}
