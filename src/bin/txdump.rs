/*
** This file is a part of Typedxml (typed XML object marshalling)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Typedxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::env;
use std::fs::File;
use std::io::Read;
use std::io::stdin;
use std::process::ExitCode;

use typedxml::Error;
use typedxml::Marshaller;
use typedxml::UnmarshalOptions;
use typedxml::Unmarshaller;
use typedxml::Value;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

fn print_version() {
    println!("txdump (typedxml) v{}", VERSION);
}

fn print_usage() {
    println!(
        concat!(
            "Usage: txdump [OPTIONS] [FILE.xml...]\n",
            "This tool decodes typed XML documents and prints their values.\n",
            "Options:\n",
            "  -c, --class <CLASS>  Class name given to the root object\n",
            "  -m, --marshal        Print the document marshalled again instead\n",
            "  -b, --buffer <SIZE>  File read buffer size in bytes (default: {})\n",
            "  -h, --help           Display this help message and exit\n",
            "  -v, --version        Display the version and exit"
        ),
        DEFAULT_BUFFER_SIZE
    );
}

fn print_tree(name: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(object) => {
            println!("{}{}: {}", indent, name, object.class().unwrap_or("object"));
            for (field, value) in object.iter() {
                print_tree(field, value, depth + 1);
            }
        }
        Value::List(items) | Value::Tuple(items) => {
            println!("{}{}: {} items", indent, name, items.len());
            for (i, item) in items.iter().enumerate() {
                print_tree(&i.to_string(), item, depth + 1);
            }
        }
        value => println!("{}{}: {}", indent, name, value),
    }
}

struct Dumper {
    unmarshaller: Unmarshaller,
    marshal: bool,
}

impl Dumper {
    fn decode_file(&self, file: &str, is_stream: bool) -> Result<Value, Error> {
        let mut f: Box<dyn Read> = if is_stream {
            Box::new(stdin())
        } else {
            Box::new(File::open(file)?)
        };
        self.unmarshaller.unmarshall(&mut f)
    }

    fn output(&self, value: &Value) -> Result<(), Error> {
        if !self.marshal {
            print_tree("root", value, 0);
            return Ok(());
        }
        match value {
            Value::Object(object) => {
                println!("{}", Marshaller::new().marshall(object)?);
                Ok(())
            }
            _ => Err(Error::Structure("only objects can be marshalled")),
        }
    }

    fn dump_file(&self, file: &str, is_stream: bool) -> bool {
        let result = self
            .decode_file(file, is_stream)
            .and_then(|value| self.output(&value));
        match result {
            Ok(()) => true,
            Err(Error::Io(e)) => {
                eprintln!("Error reading file '{}': {}", file, e);
                false
            }
            Err(Error::Parse {
                description,
                location,
            }) => {
                eprintln!(
                    "Syntax error in file '{}' at line {} column {}: {}",
                    file, location.lines, location.column, description
                );
                false
            }
            Err(e) => {
                eprintln!("Cannot decode file '{}': {}", file, e);
                false
            }
        }
    }
}

fn main() -> ExitCode {
    let mut args = env::args();

    let mut files = Vec::new();
    let mut class = None;
    let mut marshal = false;
    let mut buffer_size = DEFAULT_BUFFER_SIZE;

    // Skip the first argument (program name)
    args.next();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--class" => {
                if let Some(name) = args.next() {
                    class = Some(name);
                } else {
                    eprintln!("Missing class name");
                    return ExitCode::FAILURE;
                }
            }
            "-m" | "--marshal" => {
                marshal = true;
            }
            "-b" | "--buffer" => {
                if let Some(size) = args.next() {
                    if let Ok(size) = size.parse::<usize>() {
                        buffer_size = size;
                    } else {
                        eprintln!("Invalid buffer size");
                        return ExitCode::FAILURE;
                    }
                } else {
                    eprintln!("Missing buffer size");
                    return ExitCode::FAILURE;
                }
            }
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" => {
                print_version();
                return ExitCode::SUCCESS;
            }
            _ => {
                files.push(arg);
            }
        }
    }

    let mut options = UnmarshalOptions::new().with_buffer_size(buffer_size);
    if let Some(class) = class {
        options = options.with_target_class(&class);
    }
    let dumper = Dumper {
        unmarshaller: Unmarshaller::with_options(options),
        marshal,
    };
    if files.is_empty() {
        if !dumper.dump_file("stdin", true) {
            return ExitCode::FAILURE;
        }
    } else {
        for file in files {
            if !dumper.dump_file(&file, false) {
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
