//! Transform helpers referenced by lowered code as `babelHelpers.<name>`.
//!
//! Only helpers the graph reads are emitted, plus the helpers those call.
//! The table order is the emission order.

use indexmap::IndexSet;

struct Helper {
    name: &'static str,
    requires: &'static [&'static str],
    source: &'static str,
}

const HELPERS: &[Helper] = &[
    Helper {
        name: "toPrimitive",
        requires: &[],
        source: r#"function (input, hint) {
    if (typeof input !== "object" || input === null) return input;
    var convert = input[Symbol.toPrimitive];
    if (convert !== undefined) {
      var result = convert.call(input, hint || "default");
      if (typeof result !== "object") return result;
      throw new TypeError("@@toPrimitive must return a primitive value.");
    }
    return (hint === "string" ? String : Number)(input);
  }"#,
    },
    Helper {
        name: "toPropertyKey",
        requires: &["toPrimitive"],
        source: r#"function (value) {
    var key = babelHelpers.toPrimitive(value, "string");
    return typeof key === "symbol" ? key : key + "";
  }"#,
    },
    Helper {
        name: "defineProperty",
        requires: &["toPropertyKey"],
        source: r#"function (obj, key, value) {
    key = babelHelpers.toPropertyKey(key);
    if (key in obj) {
      Object.defineProperty(obj, key, { value: value, enumerable: true, configurable: true, writable: true });
    } else {
      obj[key] = value;
    }
    return obj;
  }"#,
    },
    Helper {
        name: "objectSpread2",
        requires: &["defineProperty"],
        source: r#"function (target) {
    function ownKeys(object, enumerableOnly) {
      var keys = Object.keys(object);
      if (Object.getOwnPropertySymbols) {
        var symbols = Object.getOwnPropertySymbols(object);
        if (enumerableOnly) {
          symbols = symbols.filter(function (sym) {
            return Object.getOwnPropertyDescriptor(object, sym).enumerable;
          });
        }
        keys.push.apply(keys, symbols);
      }
      return keys;
    }
    for (var i = 1; i < arguments.length; i++) {
      var source = arguments[i] != null ? arguments[i] : {};
      if (i % 2) {
        ownKeys(Object(source), true).forEach(function (key) {
          babelHelpers.defineProperty(target, key, source[key]);
        });
      } else if (Object.getOwnPropertyDescriptors) {
        Object.defineProperties(target, Object.getOwnPropertyDescriptors(source));
      } else {
        ownKeys(Object(source)).forEach(function (key) {
          Object.defineProperty(target, key, Object.getOwnPropertyDescriptor(source, key));
        });
      }
    }
    return target;
  }"#,
    },
    Helper {
        name: "extends",
        requires: &[],
        source: r#"function (target) {
    for (var i = 1; i < arguments.length; i++) {
      var source = arguments[i];
      for (var key in source) {
        if (Object.prototype.hasOwnProperty.call(source, key)) target[key] = source[key];
      }
    }
    return target;
  }"#,
    },
    Helper {
        name: "objectWithoutPropertiesLoose",
        requires: &[],
        source: r#"function (source, excluded) {
    if (source == null) return {};
    var target = {};
    for (var key in source) {
      if (!Object.prototype.hasOwnProperty.call(source, key)) continue;
      if (excluded.indexOf(key) !== -1) continue;
      target[key] = source[key];
    }
    return target;
  }"#,
    },
    Helper {
        name: "objectWithoutProperties",
        requires: &["objectWithoutPropertiesLoose"],
        source: r#"function (source, excluded) {
    if (source == null) return {};
    var target = babelHelpers.objectWithoutPropertiesLoose(source, excluded);
    if (Object.getOwnPropertySymbols) {
      var symbols = Object.getOwnPropertySymbols(source);
      for (var i = 0; i < symbols.length; i++) {
        var sym = symbols[i];
        if (excluded.indexOf(sym) !== -1) continue;
        if (!Object.prototype.propertyIsEnumerable.call(source, sym)) continue;
        target[sym] = source[sym];
      }
    }
    return target;
  }"#,
    },
    Helper {
        name: "objectDestructuringEmpty",
        requires: &[],
        source: r#"function (value) {
    if (value == null) throw new TypeError("Cannot destructure " + value);
  }"#,
    },
    Helper {
        name: "asyncGeneratorStep",
        requires: &[],
        source: r#"function (gen, resolve, reject, next, thrown, key, arg) {
    try {
      var info = gen[key](arg);
      var value = info.value;
    } catch (error) {
      reject(error);
      return;
    }
    if (info.done) {
      resolve(value);
    } else {
      Promise.resolve(value).then(next, thrown);
    }
  }"#,
    },
    Helper {
        name: "asyncToGenerator",
        requires: &["asyncGeneratorStep"],
        source: r#"function (fn) {
    return function () {
      var self = this;
      var args = arguments;
      return new Promise(function (resolve, reject) {
        var gen = fn.apply(self, args);
        function next(value) {
          babelHelpers.asyncGeneratorStep(gen, resolve, reject, next, thrown, "next", value);
        }
        function thrown(error) {
          babelHelpers.asyncGeneratorStep(gen, resolve, reject, next, thrown, "throw", error);
        }
        next(undefined);
      });
    };
  }"#,
    },
    Helper {
        name: "checkPrivateRedeclaration",
        requires: &[],
        source: r#"function (obj, store) {
    if (store.has(obj)) {
      throw new TypeError("Cannot initialize the same private elements twice on an object");
    }
  }"#,
    },
    Helper {
        name: "classPrivateFieldInitSpec",
        requires: &["checkPrivateRedeclaration"],
        source: r#"function (obj, store, value) {
    babelHelpers.checkPrivateRedeclaration(obj, store);
    store.set(obj, value);
  }"#,
    },
    Helper {
        name: "classPrivateMethodInitSpec",
        requires: &["checkPrivateRedeclaration"],
        source: r#"function (obj, brand) {
    babelHelpers.checkPrivateRedeclaration(obj, brand);
    brand.add(obj);
  }"#,
    },
    Helper {
        name: "assertClassBrand",
        requires: &[],
        source: r#"function (brand, receiver, value) {
    if (typeof brand === "function" ? brand === receiver : brand.has(receiver)) {
      return arguments.length < 3 ? receiver : value;
    }
    throw new TypeError("Private element is not present on this object");
  }"#,
    },
    Helper {
        name: "classPrivateFieldGet2",
        requires: &["assertClassBrand"],
        source: r#"function (store, receiver) {
    return store.get(babelHelpers.assertClassBrand(store, receiver));
  }"#,
    },
    Helper {
        name: "classPrivateFieldSet2",
        requires: &["assertClassBrand"],
        source: r#"function (store, receiver, value) {
    store.set(babelHelpers.assertClassBrand(store, receiver), value);
    return value;
  }"#,
    },
    Helper {
        name: "checkInRHS",
        requires: &[],
        source: r#"function (value) {
    if (Object(value) !== value) {
      throw new TypeError("right-hand side of 'in' should be an object, got " + (value !== null ? typeof value : "null"));
    }
    return value;
  }"#,
    },
    Helper {
        name: "readOnlyError",
        requires: &[],
        source: r#"function (name) {
    throw new TypeError("\"" + name + "\" is read-only");
  }"#,
    },
    Helper {
        name: "writeOnlyError",
        requires: &[],
        source: r#"function (name) {
    throw new TypeError("\"" + name + "\" is write-only");
  }"#,
    },
];

fn lookup(name: &str) -> Option<&'static Helper> {
    HELPERS.iter().find(|helper| helper.name == name)
}

/// Whether the bundle runtime can define `name`.
pub fn is_supported(name: &str) -> bool {
    lookup(name).is_some()
}

/// Source of an object literal defining `requested` and everything they call.
///
/// Every name must satisfy [`is_supported`].
pub(super) fn object_literal<'n>(requested: impl IntoIterator<Item = &'n str>) -> String {
    let mut needed = IndexSet::new();
    let mut pending: Vec<&str> = requested.into_iter().collect();
    while let Some(name) = pending.pop() {
        if let Some(helper) = lookup(name) {
            if needed.insert(helper.name) {
                pending.extend(helper.requires);
            }
        }
    }

    let mut out = String::from("{\n");
    for helper in HELPERS.iter().filter(|h| needed.contains(h.name)) {
        out.push_str("  ");
        out.push_str(helper.name);
        out.push_str(": ");
        out.push_str(helper.source);
        out.push_str(",\n");
    }
    out.push('}');
    out
}
