use std::borrow::Cow;
use std::io::Write;

use colored::Colorize;
use hbnb_store::{ObjectStore, StoreError};
use hbnb_models::{ClassName, EntityId, ObjectKey};

use crate::editor::{LineEditor, ReadResult};

/// Commands accepted in the `<Class>.<command>(<args>)` form.
const DOTTED_COMMANDS: [&str; 5] = ["all", "count", "show", "destroy", "update"];

const DOCUMENTED: [(&str, &str); 9] = [
    ("EOF", "Exit the HBNB console"),
    ("all", "Displays all instances of a class.\nUsage: all [<class name>]"),
    ("count", "Counts the number of instances of a class.\nUsage: count <class name>"),
    ("create", "Create a new instance of a class.\nUsage: create <class name>"),
    ("destroy", "Deletes an instance of a class by id.\nUsage: destroy <class name> <id>"),
    ("help", "List available commands with \"help\" or detailed help with \"help <command>\"."),
    ("quit", "Exit the HBNB console"),
    ("show", "Show an instance of a class by id.\nUsage: show <class name> <id>"),
    (
        "update",
        "Updates an instance of a class.\nUsage: update <class name> <id> <attribute name> \"<attribute value>\"",
    ),
];

/// Whether the loop should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Executes console command lines against a store, writing replies to `out`.
pub struct Console<'a, W> {
    store: &'a dyn ObjectStore,
    out: W,
}

impl<'a, W: Write> Console<'a, W> {
    pub fn new(store: &'a dyn ObjectStore, out: W) -> Self {
        Self { store, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Read and execute lines until `quit`, end of input, or a read error.
    ///
    /// A failing command is reported on stderr and the loop continues.
    pub fn run(&mut self, editor: &mut dyn LineEditor, prompt: &str) -> anyhow::Result<()> {
        loop {
            let line = match editor.read_line(prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => "EOF".to_string(),
            };
            if !line.trim().is_empty() {
                editor.add_history(&line);
            }
            match self.execute(&line) {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) => eprintln!("{} {e:#}", "error:".red().bold()),
            }
            self.out.flush()?;
        }
    }

    /// Execute one command line.
    pub fn execute(&mut self, line: &str) -> anyhow::Result<Flow> {
        let line = rewrite_dotted(line);
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        tracing::debug!(command, args = rest, "execute");

        let args = tokenize(rest);
        match command {
            "create" => self.create(&args)?,
            "show" => self.show(&args)?,
            "destroy" => self.destroy(&args)?,
            "all" => self.all(&args)?,
            "count" => self.count(&args)?,
            "update" => self.update(&args)?,
            "help" => self.help(&args)?,
            "quit" => return Ok(Flow::Quit),
            "EOF" => {
                writeln!(self.out)?;
                return Ok(Flow::Quit);
            }
            _ => writeln!(self.out, "*** Unknown syntax: {line}")?,
        }
        Ok(Flow::Continue)
    }

    fn say(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    /// Resolve the class argument, reporting a missing or unknown name.
    fn class_arg(&mut self, args: &[String]) -> anyhow::Result<Option<ClassName>> {
        let Some(name) = args.first() else {
            self.say("** class name missing **")?;
            return Ok(None);
        };
        match self.store.registry().resolve(name) {
            Ok(class) => Ok(Some(class)),
            Err(_) => {
                self.say("** class doesn't exist **")?;
                Ok(None)
            }
        }
    }

    /// Resolve `<class> <id>` to the key of a stored entity.
    fn existing_key(&mut self, args: &[String]) -> anyhow::Result<Option<ObjectKey>> {
        let Some(class) = self.class_arg(args)? else {
            return Ok(None);
        };
        let Some(id) = args.get(1) else {
            self.say("** instance id missing **")?;
            return Ok(None);
        };
        let key = match EntityId::parse(id) {
            Ok(id) => ObjectKey::new(class, id),
            Err(_) => {
                self.say("** no instance found **")?;
                return Ok(None);
            }
        };
        if !self.store.contains(&key)? {
            self.say("** no instance found **")?;
            return Ok(None);
        }
        Ok(Some(key))
    }

    fn create(&mut self, args: &[String]) -> anyhow::Result<()> {
        let Some(class) = self.class_arg(args)? else {
            return Ok(());
        };
        let entity = self.store.create(class)?;
        self.store.persist()?;
        writeln!(self.out, "{}", entity.id())?;
        Ok(())
    }

    fn show(&mut self, args: &[String]) -> anyhow::Result<()> {
        let Some(key) = self.existing_key(args)? else {
            return Ok(());
        };
        match self.store.get(&key)? {
            Some(entity) => writeln!(self.out, "{}", entity.render())?,
            None => self.say("** no instance found **")?,
        }
        Ok(())
    }

    fn destroy(&mut self, args: &[String]) -> anyhow::Result<()> {
        let Some(key) = self.existing_key(args)? else {
            return Ok(());
        };
        if !self.store.destroy(&key)? {
            self.say("** no instance found **")?;
        }
        Ok(())
    }

    fn all(&mut self, args: &[String]) -> anyhow::Result<()> {
        let filter = match args.first() {
            None => None,
            Some(_) => match self.class_arg(args)? {
                Some(class) => Some(class),
                None => return Ok(()),
            },
        };
        let rendered: Vec<String> = self
            .store
            .scan(filter)?
            .iter()
            .map(|entity| quote(&entity.render()))
            .collect();
        writeln!(self.out, "[{}]", rendered.join(", "))?;
        Ok(())
    }

    fn count(&mut self, args: &[String]) -> anyhow::Result<()> {
        let Some(class) = self.class_arg(args)? else {
            return Ok(());
        };
        let n = self.store.count(class)?;
        writeln!(self.out, "{n}")?;
        Ok(())
    }

    fn update(&mut self, args: &[String]) -> anyhow::Result<()> {
        let Some(key) = self.existing_key(args)? else {
            return Ok(());
        };
        let Some(attribute) = args.get(2) else {
            return self.say("** attribute name missing **");
        };
        let Some(value) = args.get(3) else {
            return self.say("** value missing **");
        };

        match self
            .store
            .update(&key, &mut |entity| entity.set_attribute(attribute, value))
        {
            Ok(true) => {}
            Ok(false) => return self.say("** no instance found **"),
            Err(StoreError::Model(e)) => return self.say(&format!("** {e} **")),
            Err(e) => return Err(e.into()),
        }
        self.store.touch_and_save(&key)?;
        Ok(())
    }

    fn help(&mut self, args: &[String]) -> anyhow::Result<()> {
        let Some(topic) = args.first() else {
            let names: Vec<&str> = DOCUMENTED.iter().map(|(name, _)| *name).collect();
            writeln!(self.out)?;
            writeln!(self.out, "Documented commands (type help <topic>):")?;
            writeln!(self.out, "{}", "=".repeat(40))?;
            writeln!(self.out, "{}", names.join("  "))?;
            writeln!(self.out)?;
            return Ok(());
        };
        let Some((_, text)) = DOCUMENTED.iter().find(|(name, _)| *name == topic.as_str()) else {
            writeln!(self.out, "*** No help on {topic}")?;
            return Ok(());
        };
        writeln!(self.out, "{text}")?;
        if text.contains("<class name>") {
            let classes: Vec<&str> = self.store.registry().classes().map(|c| c.as_str()).collect();
            writeln!(self.out, "Classes: {}", classes.join(" "))?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

/// Rewrite `<Class>.<command>(<args>)` into `<command> <Class> <args>`.
///
/// Only the commands in [`DOTTED_COMMANDS`] are rewritten; double quotes and
/// commas are removed from the argument list. Anything else is returned
/// unchanged.
pub fn rewrite_dotted(line: &str) -> Cow<'_, str> {
    let trimmed = line.trim();
    let rewritten = trimmed.split_once('.').and_then(|(class, call)| {
        let (command, args) = call.split_once('(')?;
        let args = args.strip_suffix(')')?;
        if !DOTTED_COMMANDS.contains(&command) {
            return None;
        }
        let args = args.replace(['"', ','], "");
        Some(format!("{command} {class} {}", args.trim()))
    });
    match rewritten {
        Some(line) => Cow::Owned(line),
        None => Cow::Borrowed(line),
    }
}

/// Split on whitespace, keeping double-quoted runs together without quotes.
pub fn tokenize(args: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;

    for c in args.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Single-quoted list item as the `all` listing prints it.
fn quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::PipedInput;
    use hbnb_store::{FileStorage, InMemoryObjectStore, StorageConfig};
    use serde_json::{json, Value};

    fn run(store: &dyn ObjectStore, line: &str) -> String {
        let mut console = Console::new(store, Vec::new());
        console.execute(line).unwrap();
        String::from_utf8(console.into_inner()).unwrap()
    }

    fn create(store: &dyn ObjectStore, class: &str) -> String {
        run(store, &format!("create {class}")).trim().to_string()
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn dotted_all_and_count() {
        assert_eq!(rewrite_dotted("User.all()"), "all User ");
        assert_eq!(rewrite_dotted("User.count()"), "count User ");
    }

    #[test]
    fn dotted_update_strips_quotes_and_commas() {
        assert_eq!(
            rewrite_dotted(r#"Place.update("abc-1", "name", "Loft")"#),
            "update Place abc-1 name Loft"
        );
    }

    #[test]
    fn dotted_unsupported_or_malformed_is_unchanged() {
        assert_eq!(rewrite_dotted("User.create()"), "User.create()");
        assert_eq!(rewrite_dotted("User.all("), "User.all(");
        assert_eq!(rewrite_dotted("show User 1.5"), "show User 1.5");
    }

    #[test]
    fn tokenize_keeps_quoted_runs() {
        assert_eq!(
            tokenize(r#"Place abc name "Cozy loft""#),
            vec!["Place", "abc", "name", "Cozy loft"]
        );
        assert_eq!(tokenize("  a   b "), vec!["a", "b"]);
        assert_eq!(tokenize(r#"x """#), vec!["x", ""]);
        assert!(tokenize("").is_empty());
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    #[test]
    fn create_show_destroy_cycle() {
        let store = InMemoryObjectStore::new();
        let id = create(&store, "User");
        assert_eq!(id.len(), 36);

        let shown = run(&store, &format!("show User {id}"));
        assert!(shown.starts_with(&format!("[User] ({id}) {{")));

        assert_eq!(run(&store, &format!("destroy User {id}")), "");
        assert_eq!(run(&store, &format!("show User {id}")), "** no instance found **\n");
    }

    #[test]
    fn create_errors() {
        let store = InMemoryObjectStore::new();
        assert_eq!(run(&store, "create"), "** class name missing **\n");
        assert_eq!(run(&store, "create Spaceship"), "** class doesn't exist **\n");
        assert!(store.is_empty());
    }

    #[test]
    fn show_and_destroy_errors() {
        let store = InMemoryObjectStore::new();
        for command in ["show", "destroy"] {
            assert_eq!(run(&store, command), "** class name missing **\n");
            assert_eq!(run(&store, &format!("{command} Nope 1")), "** class doesn't exist **\n");
            assert_eq!(run(&store, &format!("{command} User")), "** instance id missing **\n");
            assert_eq!(run(&store, &format!("{command} User 1")), "** no instance found **\n");
        }
    }

    #[test]
    fn all_lists_rendered_entities() {
        let store = InMemoryObjectStore::new();
        assert_eq!(run(&store, "all"), "[]\n");
        let user = create(&store, "User");
        create(&store, "State");

        let everything = run(&store, "all");
        assert!(everything.starts_with("['["));
        assert_eq!(everything.matches("', '").count(), 1);

        let users = run(&store, "all User");
        assert!(users.contains(&user));
        assert!(!users.contains("[State]"));
        assert_eq!(run(&store, "all Spaceship"), "** class doesn't exist **\n");
    }

    #[test]
    fn count_by_class() {
        let store = InMemoryObjectStore::new();
        create(&store, "City");
        create(&store, "City");
        assert_eq!(run(&store, "count City"), "2\n");
        assert_eq!(run(&store, "City.count()"), "2\n");
        assert_eq!(run(&store, "count Review"), "0\n");
        assert_eq!(run(&store, "count"), "** class name missing **\n");
        assert_eq!(run(&store, "count Spaceship"), "** class doesn't exist **\n");
    }

    #[test]
    fn update_sets_coerced_attribute() {
        let store = InMemoryObjectStore::new();
        let id = create(&store, "Place");
        assert_eq!(run(&store, &format!(r#"update Place {id} name "Cozy loft""#)), "");
        assert_eq!(run(&store, &format!("update Place {id} max_guest 4")), "");

        let key = ObjectKey::from_parts("Place", &id).unwrap();
        let place = store.get(&key).unwrap().unwrap();
        assert_eq!(place.attribute("name"), Some(json!("Cozy loft")));
        assert_eq!(place.attribute("max_guest"), Some(json!(4)));
    }

    #[test]
    fn update_through_dotted_syntax() {
        let store = InMemoryObjectStore::new();
        let id = create(&store, "User");
        run(&store, &format!(r#"User.update("{id}", "first_name", "Betty")"#));
        let key = ObjectKey::from_parts("User", &id).unwrap();
        let user = store.get(&key).unwrap().unwrap();
        assert_eq!(user.attribute("first_name"), Some(json!("Betty")));
    }

    #[test]
    fn update_errors() {
        let store = InMemoryObjectStore::new();
        let id = create(&store, "Place");
        assert_eq!(run(&store, "update"), "** class name missing **\n");
        assert_eq!(run(&store, "update Nope"), "** class doesn't exist **\n");
        assert_eq!(run(&store, "update Place"), "** instance id missing **\n");
        assert_eq!(run(&store, "update Place ghost"), "** no instance found **\n");
        assert_eq!(run(&store, &format!("update Place {id}")), "** attribute name missing **\n");
        assert_eq!(run(&store, &format!("update Place {id} name")), "** value missing **\n");
        assert_eq!(
            run(&store, &format!("update Place {id} id other")),
            "** attribute is read-only: id **\n"
        );
        let invalid = run(&store, &format!("update Place {id} latitude north"));
        assert!(invalid.starts_with("** invalid value \"north\" for latitude"));
    }

    #[test]
    fn failed_update_does_not_touch() {
        let store = InMemoryObjectStore::new();
        let id = create(&store, "Place");
        let key = ObjectKey::from_parts("Place", &id).unwrap();
        let before = store.get(&key).unwrap().unwrap().to_dict().unwrap();
        run(&store, &format!("update Place {id} number_rooms lots"));
        assert_eq!(store.get(&key).unwrap().unwrap().to_dict().unwrap(), before);
    }

    #[test]
    fn help_lists_and_describes() {
        let store = InMemoryObjectStore::new();
        let listing = run(&store, "help");
        assert!(listing.contains("Documented commands (type help <topic>):"));
        assert!(listing.contains("EOF  all  count  create"));
        let create = run(&store, "help create");
        assert!(create.starts_with("Create a new instance of a class."));
        assert!(create.contains("Classes: BaseModel User Place State City Amenity Review\n"));
        assert!(!run(&store, "help quit").contains("Classes:"));
        assert_eq!(run(&store, "help nothing"), "*** No help on nothing\n");
    }

    #[test]
    fn quit_eof_and_blank_lines() {
        let store = InMemoryObjectStore::new();
        let mut console = Console::new(&store, Vec::new());
        assert_eq!(console.execute("").unwrap(), Flow::Continue);
        assert_eq!(console.execute("   ").unwrap(), Flow::Continue);
        assert_eq!(console.execute("quit").unwrap(), Flow::Quit);
        assert_eq!(console.execute("EOF").unwrap(), Flow::Quit);
        assert_eq!(console.into_inner(), b"\n");
    }

    #[test]
    fn unknown_syntax() {
        let store = InMemoryObjectStore::new();
        assert_eq!(run(&store, "launch rockets"), "*** Unknown syntax: launch rockets\n");
        assert_eq!(run(&store, "User.fly()"), "*** Unknown syntax: User.fly()\n");
    }

    // -----------------------------------------------------------------------
    // Loop and persistence
    // -----------------------------------------------------------------------

    #[test]
    fn run_reads_until_quit() {
        let store = InMemoryObjectStore::new();
        let mut input = PipedInput::new("create State\ncreate City\nquit\ncreate User\n".as_bytes());
        let mut console = Console::new(&store, Vec::new());
        console.run(&mut input, "").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.count(ClassName::User).unwrap(), 0);
    }

    #[test]
    fn run_stops_at_end_of_input() {
        let store = InMemoryObjectStore::new();
        let mut input = PipedInput::new("count State\n".as_bytes());
        let mut console = Console::new(&store, Vec::new());
        console.run(&mut input, "").unwrap();
        assert_eq!(String::from_utf8(console.into_inner()).unwrap(), "0\n\n");
    }

    #[test]
    fn update_price_persists_integer() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(dir.path().join("file.json"));
        let store = FileStorage::open(config.clone()).unwrap();

        let id = create(&store, "Place");
        run(&store, &format!("update Place {id} price_by_night 100"));

        let document: Value =
            serde_json::from_slice(&std::fs::read(&config.file_path).unwrap()).unwrap();
        assert_eq!(document[format!("Place.{id}")]["price_by_night"], json!(100));

        let reopened = FileStorage::open(config).unwrap();
        let shown = run(&reopened, &format!("show Place {id}"));
        assert!(shown.contains("\"price_by_night\":100"));
    }

    #[test]
    fn create_and_destroy_persist() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(dir.path().join("file.json"));
        let store = FileStorage::open(config.clone()).unwrap();

        let id = create(&store, "Amenity");
        assert_eq!(FileStorage::open(config.clone()).unwrap().len(), 1);

        run(&store, &format!("Amenity.destroy({id})"));
        assert!(FileStorage::open(config).unwrap().is_empty());
    }
}
