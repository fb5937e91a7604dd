//! Literal file contents written into generated projects.
//!
//! Opaque to the engine: each function returns the exact bytes of one file.

use mernkit_core::domain::{Orm, ProjectConfig};

// ── Frontend (webpack) ────────────────────────────────────────────────────────

pub fn webpack_config() -> &'static str {
    r#"const path = require('path');
const HtmlWebpackPlugin = require('html-webpack-plugin');

module.exports = {
  entry: './src/index.js',
  output: {
    path: path.resolve(__dirname, 'dist'),
    filename: 'bundle.js',
  },
  module: {
    rules: [
      {
        test: /\.(js|jsx)$/,
        exclude: /node_modules/,
        use: {
          loader: 'babel-loader',
          options: {
            presets: ['@babel/preset-env', '@babel/preset-react']
          }
        }
      },
      {
        test: /\.css$/,
        use: ['style-loader', 'css-loader']
      }
    ]
  },
  plugins: [
    new HtmlWebpackPlugin({
      template: './public/index.html'
    })
  ],
  devServer: {
    static: {
      directory: path.join(__dirname, 'dist'),
    },
    compress: true,
    port: 3000,
    hot: true,
    historyApiFallback: true,
    proxy: {
      '/api': 'http://localhost:5000'
    }
  }
};
"#
}

pub fn react_index_js() -> &'static str {
    r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';

const root = ReactDOM.createRoot(document.getElementById('root'));
root.render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);
"#
}

pub fn react_app_js() -> &'static str {
    r#"import React from 'react';

function App() {
  return (
    <div>
      <h1>Welcome to My MERN App</h1>
    </div>
  );
}

export default App;
"#
}

pub fn index_html() -> &'static str {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>MERN App</title>
</head>
<body>
  <div id="root"></div>
</body>
</html>
"#
}

// ── Tailwind ──────────────────────────────────────────────────────────────────

/// Vite config with the Tailwind v4 plugin registered.
pub fn vite_config_with_tailwind() -> &'static str {
    r#"import { defineConfig } from 'vite'
import react from '@vitejs/plugin-react'
import tailwindcss from '@tailwindcss/vite'

// https://vite.dev/config/
export default defineConfig({
  plugins: [
    react(),
    tailwindcss()
  ],
})
"#
}

pub fn tailwind_css_vite() -> &'static str {
    "@import \"tailwindcss\";\n"
}

pub fn tailwind_config_cjs() -> &'static str {
    r#"/** @type {import('tailwindcss').Config} */
module.exports = {
  content: [
    "./src/**/*.{js,jsx,ts,tsx}",
    "./public/index.html"
  ],
  theme: {
    extend: {},
  },
  plugins: [],
};
"#
}

pub fn postcss_config_cjs() -> &'static str {
    r#"module.exports = {
  plugins: {
    tailwindcss: {},
    autoprefixer: {},
  },
};
"#
}

pub fn tailwind_css_postcss() -> &'static str {
    "@tailwind base;\n@tailwind components;\n@tailwind utilities;\n"
}

pub const CSS_IMPORT: &str = "import './index.css';";

// ── Backend ───────────────────────────────────────────────────────────────────

pub fn backend_index_js(orm: Orm) -> String {
    let database = match orm {
        Orm::Mongoose => {
            r#"const mongoose = require('mongoose');

mongoose
  .connect(process.env.MONGO_URI)
  .then(() => console.log('MongoDB connected'))
  .catch((err) => console.error('MongoDB connection error:', err.message));

"#
        }
        Orm::Sequelize | Orm::None => "",
    };

    format!(
        r#"require('dotenv').config();
const express = require('express');
const cors = require('cors');
const exampleRoutes = require('./routes/exampleRoutes');

{database}const app = express();
const PORT = process.env.PORT || 5000;

// Middleware
app.use(cors());
app.use(express.json());

// Routes
app.use('/api/examples', exampleRoutes);

app.get('/', (req, res) => {{
  res.send('Backend Server is Running');
}});

// Error handling middleware
app.use((err, req, res, next) => {{
  console.error(err.stack);
  res.status(500).send('Something broke!');
}});

app.listen(PORT, () => {{
  console.log(`Server running on port ${{PORT}}`);
}});
"#
    )
}

pub fn example_routes_js() -> &'static str {
    r#"const express = require('express');
const router = express.Router();
const {
  getExamples,
  getExampleById,
  createExample,
  updateExample,
  deleteExample
} = require('../controllers/exampleController');

router.get('/', getExamples);
router.get('/:id', getExampleById);
router.post('/', createExample);
router.put('/:id', updateExample);
router.delete('/:id', deleteExample);

module.exports = router;
"#
}

pub fn example_controller_js() -> &'static str {
    r#"// In-memory store; replace with a real database.
let examples = [
  { id: 1, name: 'Example 1', description: 'First example' },
  { id: 2, name: 'Example 2', description: 'Second example' }
];

const getExamples = (req, res) => {
  res.status(200).json(examples);
};

const getExampleById = (req, res) => {
  const example = examples.find(e => e.id === parseInt(req.params.id));

  if (example) {
    res.status(200).json(example);
  } else {
    res.status(404).json({ message: 'Example not found' });
  }
};

const createExample = (req, res) => {
  if (!req.body.name || !req.body.description) {
    return res.status(400).json({ message: 'Please include name and description' });
  }

  const example = {
    id: examples.length + 1,
    name: req.body.name,
    description: req.body.description
  };

  examples.push(example);
  res.status(201).json(example);
};

const updateExample = (req, res) => {
  const example = examples.find(e => e.id === parseInt(req.params.id));

  if (!example) {
    return res.status(404).json({ message: 'Example not found' });
  }

  example.name = req.body.name || example.name;
  example.description = req.body.description || example.description;

  res.status(200).json(example);
};

const deleteExample = (req, res) => {
  const index = examples.findIndex(e => e.id === parseInt(req.params.id));

  if (index === -1) {
    return res.status(404).json({ message: 'Example not found' });
  }

  examples.splice(index, 1);
  res.status(200).json({ message: 'Example removed' });
};

module.exports = {
  getExamples,
  getExampleById,
  createExample,
  updateExample,
  deleteExample
};
"#
}

/// `backend/.env`: always `PORT` and `NODE_ENV`, plus ORM connection keys.
pub fn env_file(config: &ProjectConfig) -> String {
    let mut env = String::from("PORT=5000\nNODE_ENV=development\n");
    match config.orm() {
        Orm::Mongoose => {
            env.push_str(&format!(
                "MONGO_URI=mongodb://localhost:27017/{}\n",
                config.name()
            ));
        }
        Orm::Sequelize => {
            env.push_str(&format!(
                "DB_NAME={}\nDB_USER=root\nDB_PASSWORD=\nDB_HOST=localhost\n",
                config.name()
            ));
        }
        Orm::None => {}
    }
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(orm: Orm) -> ProjectConfig {
        ProjectConfig::builder("shop").orm(orm).build().unwrap()
    }

    #[test]
    fn env_file_for_mongoose_has_uri() {
        assert_eq!(
            env_file(&config(Orm::Mongoose)),
            "PORT=5000\nNODE_ENV=development\nMONGO_URI=mongodb://localhost:27017/shop\n"
        );
    }

    #[test]
    fn env_file_for_sequelize_has_db_keys() {
        let env = env_file(&config(Orm::Sequelize));
        assert!(env.contains("DB_NAME=shop\n"));
        assert!(env.contains("DB_USER=root\n"));
        assert!(env.contains("DB_PASSWORD=\n"));
        assert!(env.contains("DB_HOST=localhost\n"));
        assert!(!env.contains("MONGO_URI"));
    }

    #[test]
    fn env_file_without_orm_is_minimal() {
        assert_eq!(
            env_file(&config(Orm::None)),
            "PORT=5000\nNODE_ENV=development\n"
        );
    }

    #[test]
    fn backend_index_connects_only_for_mongoose() {
        let mongoose = backend_index_js(Orm::Mongoose);
        assert!(mongoose.contains("require('mongoose')"));
        assert!(mongoose.contains(".connect(process.env.MONGO_URI)"));
        assert!(!backend_index_js(Orm::None).contains("mongoose"));
        assert!(backend_index_js(Orm::Sequelize).contains("app.listen(PORT"));
    }
}
